//! Visit counting: the [`VisitCountStore`], its cookie codec, and the
//! [`VisitRecorder`] that bumps a page's count on each view.

mod codec;
mod page_key;
mod recorder;
mod store;

pub use codec::{decode, encode, try_decode};
pub use page_key::{is_valid_page_key, PageKey};
pub use recorder::{PageTrackingConfig, VisitRecorder};
pub use store::VisitCountStore;
