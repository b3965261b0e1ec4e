//! Thinking-mode selector.
//!
//! The mode is forwarded verbatim to the backend, which maps it to a system
//! prompt; the semantics live entirely server-side. The client only has to
//! produce the exact wire strings.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The reply-generation mode sent with every chat message.
///
/// Wire strings are kebab-case: `reflective`, `creative`, `factual`,
/// `meta-cognitive`. When the user never picked a mode, `Reflective` is the
/// fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ThinkingMode {
    /// Encourage reflection and follow-up questions (backend default).
    #[default]
    Reflective,
    /// Broaden ideas, offer free-form examples.
    Creative,
    /// Prioritize verifiable facts and cited grounds.
    Factual,
    /// Guide the user to notice their own way of learning.
    MetaCognitive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wire_strings() {
        assert_eq!(
            serde_json::to_string(&ThinkingMode::Reflective).unwrap(),
            "\"reflective\""
        );
        assert_eq!(
            serde_json::to_string(&ThinkingMode::MetaCognitive).unwrap(),
            "\"meta-cognitive\""
        );
    }

    #[test]
    fn test_display_matches_wire() {
        for mode in ThinkingMode::iter() {
            let wire = serde_json::to_string(&mode).unwrap();
            assert_eq!(wire, format!("\"{}\"", mode));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ThinkingMode::from_str("meta-cognitive").unwrap(),
            ThinkingMode::MetaCognitive
        );
        assert!(ThinkingMode::from_str("sceptical").is_err());
    }

    #[test]
    fn test_default_is_reflective() {
        assert_eq!(ThinkingMode::default(), ThinkingMode::Reflective);
    }
}
