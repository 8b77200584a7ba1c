//! Recorded answers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{Checkpoint, ChoiceId, ValidationError};

/// Key under which a response is recorded.
///
/// Checkpoint selections use the checkpoint id (`q1`, `q2`, `q3`); check-in
/// answers use `check_in_<layer>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseKey(String);

impl ResponseKey {
    /// Creates a new ResponseKey, returning error if empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::empty_field("response_key"));
        }
        Ok(Self(key))
    }

    /// Key of a checkpoint's selection.
    pub fn for_checkpoint(checkpoint: Checkpoint) -> Self {
        Self(checkpoint.id().to_string())
    }

    /// Key of the check-in answer following a checkpoint.
    pub fn for_check_in(checkpoint: Checkpoint) -> Self {
        Self(format!("check_in_{}", checkpoint.layer()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selected value: one choice, or an ordered list of choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Single(ChoiceId),
    Multiple(Vec<ChoiceId>),
}

impl ResponseValue {
    /// Builds a single-choice value.
    pub fn single(id: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(ResponseValue::Single(ChoiceId::new(id)?))
    }

    /// Builds an ordered multi-choice value.
    pub fn multiple<I, S>(ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids
            .into_iter()
            .map(ChoiceId::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResponseValue::Multiple(ids))
    }

    /// True when nothing is actually selected.
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Single(id) => id.as_str().is_empty(),
            ResponseValue::Multiple(ids) => ids.is_empty(),
        }
    }

    /// Selected choices in order.
    pub fn choice_ids(&self) -> Vec<&ChoiceId> {
        match self {
            ResponseValue::Single(id) => vec![id],
            ResponseValue::Multiple(ids) => ids.iter().collect(),
        }
    }
}

/// All recorded responses of a session.
///
/// Keys are unique; saving under an existing key replaces the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(HashMap<ResponseKey, ResponseValue>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ResponseKey) -> Option<&ResponseValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &ResponseKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResponseKey, &ResponseValue)> {
        self.0.iter()
    }

    /// Selection recorded for a checkpoint.
    pub fn selection(&self, checkpoint: Checkpoint) -> Option<&ResponseValue> {
        self.get(&ResponseKey::for_checkpoint(checkpoint))
    }

    /// Records a response; returns the value it replaced.
    pub(crate) fn save(&mut self, key: ResponseKey, value: ResponseValue) -> Option<ResponseValue> {
        self.0.insert(key, value)
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(ResponseKey, ResponseValue)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (ResponseKey, ResponseValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_and_check_in_keys() {
        assert_eq!(ResponseKey::for_checkpoint(Checkpoint::Q2).as_str(), "q2");
        assert_eq!(ResponseKey::for_check_in(Checkpoint::Q3).as_str(), "check_in_3");
    }

    #[test]
    fn response_key_rejects_blank() {
        assert!(ResponseKey::new(" ").is_err());
    }

    #[test]
    fn empty_multiple_value_is_empty() {
        let value = ResponseValue::multiple(Vec::<String>::new()).unwrap();
        assert!(value.is_empty());
        assert!(!ResponseValue::single("yes").unwrap().is_empty());
    }

    #[test]
    fn multiple_rejects_blank_choice() {
        assert!(ResponseValue::multiple(["a", ""]).is_err());
    }

    #[test]
    fn multiple_keeps_order() {
        let value = ResponseValue::multiple(["c", "a", "b"]).unwrap();
        let ids: Vec<&str> = value.choice_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn save_replaces_existing_key() {
        let mut set = ResponseSet::new();
        let key = ResponseKey::for_checkpoint(Checkpoint::Q1);
        assert!(set.save(key.clone(), ResponseValue::single("a").unwrap()).is_none());
        let replaced = set.save(key.clone(), ResponseValue::single("b").unwrap());

        assert_eq!(replaced, Some(ResponseValue::single("a").unwrap()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.selection(Checkpoint::Q1), Some(&ResponseValue::single("b").unwrap()));
    }

    #[test]
    fn untagged_values_roundtrip_from_json() {
        let set: ResponseSet =
            serde_json::from_str(r#"{"q1": "agree", "q2": ["x", "y"]}"#).unwrap();
        assert_eq!(set.selection(Checkpoint::Q1), Some(&ResponseValue::single("agree").unwrap()));
        assert_eq!(
            set.selection(Checkpoint::Q2),
            Some(&ResponseValue::multiple(["x", "y"]).unwrap())
        );
    }
}
