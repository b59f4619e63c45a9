//! Serde helpers for patch inputs.
//!
//! A nullable record field has three patch states: absent (leave it alone),
//! `null` (clear it) and a value (replace it). Patch fields model that as
//! `Option<Option<T>>`:
//!
//! ```ignore
//! #[serde(
//!     default,
//!     deserialize_with = "crate::serde::nullable",
//!     skip_serializing_if = "Option::is_none"
//! )]
//! pub description: Option<Option<String>>,
//! ```
//!
//! `default` yields `None` for an absent field, the deserializer wraps
//! whatever is present (including `null`) in `Some`. Serializing `Some(None)`
//! writes `null` back out.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field, keeping an explicit `null` as `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct TestPatch {
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_absent_field_is_none() {
        let patch: TestPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.note, None);
    }

    #[test]
    fn test_null_field_is_some_none() {
        let patch: TestPatch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        assert_eq!(patch.note, Some(None));
    }

    #[test]
    fn test_value_field_is_some_some() {
        let patch: TestPatch = serde_json::from_str(r#"{"note":"x"}"#).unwrap();
        assert_eq!(patch.note, Some(Some("x".to_string())));
    }

    #[test]
    fn test_serialize_keeps_the_three_states() {
        let clear = TestPatch { note: Some(None) };
        assert_eq!(serde_json::to_string(&clear).unwrap(), r#"{"note":null}"#);
        assert_eq!(serde_json::to_string(&TestPatch::default()).unwrap(), "{}");
    }
}
