use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier.
///
/// The API is free to hand out numeric or textual keys; whichever form it
/// sends is preserved when the id is echoed back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Interpret user input as an identifier. Blank input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(trimmed.to_string()),
        })
    }

    /// Compare ids by their rendered form, so `3` and `"3"` refer to the same record.
    pub fn same_as(&self, other: &RecordId) -> bool {
        match (self, other) {
            (RecordId::Number(a), RecordId::Number(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_wire_form() {
        let num: RecordId = serde_json::from_value(json!(7)).unwrap();
        let text: RecordId = serde_json::from_value(json!("D-7")).unwrap();
        assert_eq!(num, RecordId::Number(7));
        assert_eq!(text, RecordId::Text("D-7".into()));
        assert_eq!(serde_json::to_value(&num).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("D-7"));
    }

    #[test]
    fn parse_prefers_numbers_and_rejects_blank() {
        assert_eq!(RecordId::parse(" 12 "), Some(RecordId::Number(12)));
        assert_eq!(RecordId::parse("mgr-1"), Some(RecordId::Text("mgr-1".into())));
        assert_eq!(RecordId::parse("   "), None);
    }

    #[test]
    fn numeric_and_textual_forms_match() {
        assert!(RecordId::Number(3).same_as(&RecordId::Text("3".into())));
        assert!(!RecordId::Number(3).same_as(&RecordId::Number(4)));
    }
}
