//! Phase enum, the active phase sequence, and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Checkpoint;

/// One discrete screen/step of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Main,
    Q1Selection,
    Q1Review,
    CheckIn1,
    Q2Selection,
    Q2Review,
    CheckIn2,
    Q3Selection,
    Q3Review,
    CheckIn3,
    Summary,
}

impl Phase {
    /// Returns all phases in canonical order.
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Main,
            Phase::Q1Selection,
            Phase::Q1Review,
            Phase::CheckIn1,
            Phase::Q2Selection,
            Phase::Q2Review,
            Phase::CheckIn2,
            Phase::Q3Selection,
            Phase::Q3Review,
            Phase::CheckIn3,
            Phase::Summary,
        ]
    }

    /// Returns the 0-based index of this phase in the canonical order.
    pub fn order_index(&self) -> usize {
        Self::all()
            .iter()
            .position(|p| p == self)
            .unwrap_or_default()
    }

    /// Selection phase of a checkpoint.
    pub fn selection(checkpoint: Checkpoint) -> Phase {
        match checkpoint {
            Checkpoint::Q1 => Phase::Q1Selection,
            Checkpoint::Q2 => Phase::Q2Selection,
            Checkpoint::Q3 => Phase::Q3Selection,
        }
    }

    /// Review phase of a checkpoint.
    pub fn review(checkpoint: Checkpoint) -> Phase {
        match checkpoint {
            Checkpoint::Q1 => Phase::Q1Review,
            Checkpoint::Q2 => Phase::Q2Review,
            Checkpoint::Q3 => Phase::Q3Review,
        }
    }

    /// Check-in interlude following a checkpoint.
    pub fn check_in(checkpoint: Checkpoint) -> Phase {
        match checkpoint {
            Checkpoint::Q1 => Phase::CheckIn1,
            Checkpoint::Q2 => Phase::CheckIn2,
            Checkpoint::Q3 => Phase::CheckIn3,
        }
    }

    /// The checkpoint this phase belongs to, if any.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        match self {
            Phase::Q1Selection | Phase::Q1Review | Phase::CheckIn1 => Some(Checkpoint::Q1),
            Phase::Q2Selection | Phase::Q2Review | Phase::CheckIn2 => Some(Checkpoint::Q2),
            Phase::Q3Selection | Phase::Q3Review | Phase::CheckIn3 => Some(Checkpoint::Q3),
            Phase::Main | Phase::Summary => None,
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, Phase::Q1Selection | Phase::Q2Selection | Phase::Q3Selection)
    }

    pub fn is_review(&self) -> bool {
        matches!(self, Phase::Q1Review | Phase::Q2Review | Phase::Q3Review)
    }

    pub fn is_check_in(&self) -> bool {
        matches!(self, Phase::CheckIn1 | Phase::CheckIn2 | Phase::CheckIn3)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Main => "Main",
            Phase::Q1Selection => "Initial Position",
            Phase::Q1Review => "Initial Position Review",
            Phase::CheckIn1 => "Check-in 1",
            Phase::Q2Selection => "Challenge",
            Phase::Q2Review => "Challenge Review",
            Phase::CheckIn2 => "Check-in 2",
            Phase::Q3Selection => "Mind Changer",
            Phase::Q3Review => "Mind Changer Review",
            Phase::CheckIn3 => "Check-in 3",
            Phase::Summary => "Summary",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The phases a session actually walks through.
///
/// Check-in interludes are optional; when they are disabled the sequence
/// skips them and "adjacent" is measured over the remaining phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSequence {
    include_check_ins: bool,
}

impl PhaseSequence {
    pub fn new(include_check_ins: bool) -> Self {
        Self { include_check_ins }
    }

    pub fn includes_check_ins(&self) -> bool {
        self.include_check_ins
    }

    /// Returns true if `phase` is part of this sequence.
    pub fn contains(&self, phase: Phase) -> bool {
        self.include_check_ins || !phase.is_check_in()
    }

    /// Phases of this sequence in order.
    pub fn phases(&self) -> Vec<Phase> {
        Phase::all()
            .iter()
            .copied()
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// The phase after `phase`, if any.
    pub fn next(&self, phase: Phase) -> Option<Phase> {
        Phase::all()[phase.order_index() + 1..]
            .iter()
            .copied()
            .find(|p| self.contains(*p))
    }

    /// The phase before `phase`, if any.
    pub fn previous(&self, phase: Phase) -> Option<Phase> {
        Phase::all()[..phase.order_index()]
            .iter()
            .rev()
            .copied()
            .find(|p| self.contains(*p))
    }
}

impl Default for PhaseSequence {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Why the phase is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Forward one step in the sequence.
    Advance,
    /// Back one step in the sequence.
    Back,
    /// Exit confirmation returning to the landing phase.
    Exit,
    /// Responses cleared; start over from the landing phase.
    Reset,
    /// `continue_flow` landing on the computed resume target.
    Resume,
    /// Explicit "go to layer N" override.
    LayerShortcut,
}

impl TransitionKind {
    /// Returns true if moving `from` → `to` is allowed for this kind of move.
    pub fn permits(&self, sequence: &PhaseSequence, from: Phase, to: Phase) -> bool {
        match self {
            TransitionKind::Advance => sequence.next(from) == Some(to),
            TransitionKind::Back => sequence.previous(from) == Some(to),
            TransitionKind::Exit | TransitionKind::Reset => to == Phase::Main,
            TransitionKind::Resume => to.is_selection() || to == Phase::Summary,
            TransitionKind::LayerShortcut => to.is_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_returns_eleven_phases_starting_at_main() {
        let all = Phase::all();
        assert_eq!(all.len(), 11);
        assert_eq!(all[0], Phase::Main);
        assert_eq!(all[10], Phase::Summary);
    }

    #[test]
    fn default_phase_is_main() {
        assert_eq!(Phase::default(), Phase::Main);
    }

    #[test]
    fn checkpoint_phases_map_back_to_checkpoint() {
        for cp in Checkpoint::all() {
            assert_eq!(Phase::selection(*cp).checkpoint(), Some(*cp));
            assert_eq!(Phase::review(*cp).checkpoint(), Some(*cp));
            assert_eq!(Phase::check_in(*cp).checkpoint(), Some(*cp));
        }
        assert_eq!(Phase::Main.checkpoint(), None);
        assert_eq!(Phase::Summary.checkpoint(), None);
    }

    #[test]
    fn full_sequence_walks_every_phase() {
        let seq = PhaseSequence::new(true);
        let mut walked = vec![Phase::Main];
        let mut current = Phase::Main;
        while let Some(next) = seq.next(current) {
            walked.push(next);
            current = next;
        }
        assert_eq!(walked, Phase::all().to_vec());
    }

    #[test]
    fn sequence_without_check_ins_skips_them() {
        let seq = PhaseSequence::new(false);
        assert_eq!(seq.next(Phase::Q1Review), Some(Phase::Q2Selection));
        assert_eq!(seq.next(Phase::Q3Review), Some(Phase::Summary));
        assert_eq!(seq.previous(Phase::Q2Selection), Some(Phase::Q1Review));
        assert_eq!(seq.phases().len(), 8);
    }

    #[test]
    fn sequence_ends_have_no_neighbour() {
        let seq = PhaseSequence::default();
        assert_eq!(seq.previous(Phase::Main), None);
        assert_eq!(seq.next(Phase::Summary), None);
    }

    #[test]
    fn advance_permits_only_next_phase() {
        let seq = PhaseSequence::default();
        assert!(TransitionKind::Advance.permits(&seq, Phase::Q1Review, Phase::CheckIn1));
        assert!(!TransitionKind::Advance.permits(&seq, Phase::Q1Review, Phase::Q2Selection));
        assert!(!TransitionKind::Advance.permits(&seq, Phase::Q1Selection, Phase::Summary));
    }

    #[test]
    fn back_permits_only_previous_phase() {
        let seq = PhaseSequence::default();
        assert!(TransitionKind::Back.permits(&seq, Phase::Q1Selection, Phase::Main));
        assert!(!TransitionKind::Back.permits(&seq, Phase::Q2Selection, Phase::Main));
    }

    #[test]
    fn exit_and_reset_only_reach_main() {
        let seq = PhaseSequence::default();
        for kind in [TransitionKind::Exit, TransitionKind::Reset] {
            assert!(kind.permits(&seq, Phase::Q3Review, Phase::Main));
            assert!(!kind.permits(&seq, Phase::Q3Review, Phase::Q1Selection));
        }
    }

    #[test]
    fn resume_reaches_selection_phases_and_summary() {
        let seq = PhaseSequence::default();
        assert!(TransitionKind::Resume.permits(&seq, Phase::Main, Phase::Q2Selection));
        assert!(TransitionKind::Resume.permits(&seq, Phase::Main, Phase::Summary));
        assert!(!TransitionKind::Resume.permits(&seq, Phase::Main, Phase::Q2Review));
    }

    #[test]
    fn layer_shortcut_reaches_selection_phases_only() {
        let seq = PhaseSequence::default();
        assert!(TransitionKind::LayerShortcut.permits(&seq, Phase::Summary, Phase::Q1Selection));
        assert!(!TransitionKind::LayerShortcut.permits(&seq, Phase::Main, Phase::Summary));
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&Phase::Q2Selection).unwrap(),
            "\"q2_selection\""
        );
        let phase: Phase = serde_json::from_str("\"check_in3\"").unwrap();
        assert_eq!(phase, Phase::CheckIn3);
    }
}
