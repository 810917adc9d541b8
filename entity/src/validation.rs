use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::RecordId;

/// Validation messages keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Label shown next to an editable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// A validated request, ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission<P> {
    Create(P),
    Update { id: RecordId, payload: P },
}

impl<P> Submission<P> {
    pub fn is_update(&self) -> bool {
        matches!(self, Submission::Update { .. })
    }
}

/// Blank means empty after trimming.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_messages_in_key_order() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name is required.");
        errors.insert("head", "Head is required.");
        assert_eq!(errors.to_string(), "Head is required. Name is required.");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["head", "name"]);
    }
}
