use std::fmt::{self, Display};

use crate::document::Element;

/// Attribute holding the page key a block watches.
pub const ATTR_TARGET_KEY: &str = "data-cookie-name";
/// Attribute holding the minimum visit count.
pub const ATTR_MIN_VISITS: &str = "data-min-visits";
/// Attribute holding the visibility mode.
pub const ATTR_VISIBILITY_MODE: &str = "data-visibility-mode";

/// What a block does once its visit threshold is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Reveal the block when the threshold is met.
    #[default]
    Show,
    /// Conceal the block when the threshold is met.
    Hide,
}

impl VisibilityMode {
    /// Reads the mode attribute. Anything other than `hide` means `show`.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some("hide") => VisibilityMode::Hide,
            _ => VisibilityMode::Show,
        }
    }
}

impl Display for VisibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityMode::Show => write!(f, "show"),
            VisibilityMode::Hide => write!(f, "hide"),
        }
    }
}

/// Settings of one conditional block, read from its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlockConfig {
    /// Page key whose visits gate the block. `None` when unset or empty.
    pub target_key: Option<String>,
    /// Visits needed for the condition to be met.
    pub min_visits: u64,
    pub mode: VisibilityMode,
}

impl ConditionalBlockConfig {
    pub fn new<S: Into<String>>(target_key: S, min_visits: u64, mode: VisibilityMode) -> Self {
        let target_key = target_key.into();
        Self {
            target_key: (!target_key.is_empty()).then_some(target_key),
            min_visits,
            mode,
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            target_key: element
                .attribute(ATTR_TARGET_KEY)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            min_visits: parse_min_visits(element.attribute(ATTR_MIN_VISITS)),
            mode: VisibilityMode::from_attribute(element.attribute(ATTR_VISIBILITY_MODE)),
        }
    }
}

/// Parses the threshold attribute the way `parseInt(value, 10)` reads it:
/// leading whitespace, an optional sign, then as many digits as present.
///
/// A missing or digit-less value gives a threshold of 0, so the condition is
/// always met. Negative values clamp to 0 and oversized values to `u64::MAX`.
pub fn parse_min_visits(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        log::warn!("Conditional block has no {ATTR_MIN_VISITS}, using 0");
        return 0;
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        log::warn!("Conditional block has malformed {ATTR_MIN_VISITS} {raw:?}, using 0");
        return 0;
    }
    if negative {
        return 0;
    }

    rest[..digits_len].parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_show() {
        assert_eq!(VisibilityMode::from_attribute(Some("hide")), VisibilityMode::Hide);
        assert_eq!(VisibilityMode::from_attribute(Some("show")), VisibilityMode::Show);
        assert_eq!(VisibilityMode::from_attribute(Some("HIDE")), VisibilityMode::Show);
        assert_eq!(VisibilityMode::from_attribute(Some("")), VisibilityMode::Show);
        assert_eq!(VisibilityMode::from_attribute(None), VisibilityMode::Show);
    }

    #[test]
    fn min_visits_parses_like_parse_int() {
        assert_eq!(parse_min_visits(Some("3")), 3);
        assert_eq!(parse_min_visits(Some("  12")), 12);
        assert_eq!(parse_min_visits(Some("+4")), 4);
        assert_eq!(parse_min_visits(Some("5 visits")), 5);
        assert_eq!(parse_min_visits(Some("007")), 7);
        assert_eq!(parse_min_visits(Some("2.9")), 2);
    }

    #[test]
    fn malformed_min_visits_is_zero() {
        assert_eq!(parse_min_visits(None), 0);
        assert_eq!(parse_min_visits(Some("")), 0);
        assert_eq!(parse_min_visits(Some("abc")), 0);
        assert_eq!(parse_min_visits(Some("-")), 0);
        assert_eq!(parse_min_visits(Some("-3")), 0);
        assert_eq!(parse_min_visits(Some("99999999999999999999999")), u64::MAX);
    }

    #[test]
    fn reads_config_from_markup() {
        let el = Element::new("div")
            .with_attribute(ATTR_TARGET_KEY, "page_5")
            .with_attribute(ATTR_MIN_VISITS, "3")
            .with_attribute(ATTR_VISIBILITY_MODE, "hide");

        assert_eq!(
            ConditionalBlockConfig::from_element(&el),
            ConditionalBlockConfig::new("page_5", 3, VisibilityMode::Hide)
        );
    }

    #[test]
    fn empty_target_is_unset() {
        let el = Element::new("div").with_attribute(ATTR_TARGET_KEY, "");
        let cfg = ConditionalBlockConfig::from_element(&el);
        assert_eq!(cfg.target_key, None);
        assert_eq!(cfg.mode, VisibilityMode::Show);
        assert_eq!(ConditionalBlockConfig::new("", 1, VisibilityMode::Show).target_key, None);
    }
}
