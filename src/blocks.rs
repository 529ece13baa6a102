//! Conditional blocks: their markup configuration and the
//! [`VisibilityEvaluator`] that shows or hides them from visit counts.

mod config;
mod evaluator;

pub use config::{
    parse_min_visits, ConditionalBlockConfig, VisibilityMode, ATTR_MIN_VISITS, ATTR_TARGET_KEY,
    ATTR_VISIBILITY_MODE,
};
pub use evaluator::{apply, decide, BlockOutcome, Visibility, VisibilityEvaluator};
