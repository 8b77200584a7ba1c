//! Checkpoint enum representing the three layered question levels.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// The three layered checkpoints of the questionnaire.
///
/// Each layer builds on the previous one: the initial position, a challenge
/// to that position, and a final "mind changer" layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Checkpoint {
    Q1,
    Q2,
    Q3,
}

impl Checkpoint {
    /// Returns all checkpoints in canonical order.
    pub fn all() -> &'static [Checkpoint] {
        &[Checkpoint::Q1, Checkpoint::Q2, Checkpoint::Q3]
    }

    /// Returns the 0-based index of this checkpoint.
    pub fn index(&self) -> usize {
        match self {
            Checkpoint::Q1 => 0,
            Checkpoint::Q2 => 1,
            Checkpoint::Q3 => 2,
        }
    }

    /// Returns the 1-based layer number.
    pub fn layer(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// Resolves a 1-based layer number.
    pub fn from_layer(layer: u8) -> Result<Self, ValidationError> {
        match layer {
            1 => Ok(Checkpoint::Q1),
            2 => Ok(Checkpoint::Q2),
            3 => Ok(Checkpoint::Q3),
            other => Err(ValidationError::out_of_range("layer", 1, 3, i32::from(other))),
        }
    }

    /// Returns the wire identifier (`q1`, `q2`, `q3`).
    pub fn id(&self) -> &'static str {
        match self {
            Checkpoint::Q1 => "q1",
            Checkpoint::Q2 => "q2",
            Checkpoint::Q3 => "q3",
        }
    }

    /// Returns the next checkpoint, if any.
    pub fn next(&self) -> Option<Checkpoint> {
        Self::all().get(self.index() + 1).copied()
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Checkpoint::Q1 => "Initial Position",
            Checkpoint::Q2 => "Challenge",
            Checkpoint::Q3 => "Mind Changer",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_returns_checkpoints_in_order() {
        assert_eq!(
            Checkpoint::all(),
            &[Checkpoint::Q1, Checkpoint::Q2, Checkpoint::Q3]
        );
    }

    #[test]
    fn from_layer_maps_one_based_numbers() {
        assert_eq!(Checkpoint::from_layer(1).unwrap(), Checkpoint::Q1);
        assert_eq!(Checkpoint::from_layer(3).unwrap(), Checkpoint::Q3);
    }

    #[test]
    fn from_layer_rejects_out_of_range() {
        assert!(Checkpoint::from_layer(0).is_err());
        assert!(matches!(
            Checkpoint::from_layer(4),
            Err(ValidationError::OutOfRange { actual: 4, .. })
        ));
    }

    #[test]
    fn layer_and_index_agree() {
        for cp in Checkpoint::all() {
            assert_eq!(cp.layer() as usize, cp.index() + 1);
            assert_eq!(Checkpoint::from_layer(cp.layer()).unwrap(), *cp);
        }
    }

    #[test]
    fn next_stops_after_q3() {
        assert_eq!(Checkpoint::Q1.next(), Some(Checkpoint::Q2));
        assert_eq!(Checkpoint::Q3.next(), None);
    }

    #[test]
    fn serializes_to_wire_id() {
        assert_eq!(serde_json::to_string(&Checkpoint::Q2).unwrap(), "\"q2\"");
        let cp: Checkpoint = serde_json::from_str("\"q3\"").unwrap();
        assert_eq!(cp, Checkpoint::Q3);
    }
}
