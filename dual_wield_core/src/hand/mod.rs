//! Hand selection - which weapon the current strike uses
//!
//! Every combatant owns a [`HandCycleState`]. It starts idle, is driven by
//! the acting combatant's strikes and sequence steps, and is cleared for
//! every combatant when an action ends (see `Battle::execute_action`).
//!
//! ```text
//!            begin_strike            finish_strike
//!   Idle ──────────────▶ MainActive ◀──────────────▶ OffActive
//!     ▲                      │  lock_to(h)                │
//!     │ reset                ▼                            ▼
//!     └──────────────── MainLocked / OffLocked (no advance)
//! ```

use crate::types::{CombatantKind, Hand};
use serde::{Deserialize, Serialize};

/// Observable phase of a hand cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPhase {
    Idle,
    MainActive,
    OffActive,
    MainLocked,
    OffLocked,
}

/// Transient per-action hand state
///
/// A single `lock` slot keeps at most one hand pinned at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCycleState {
    /// Hand of the strike in progress; `None` between actions
    current: Option<Hand>,
    /// Pinned hand, overrides `current` and suppresses advancing
    lock: Option<Hand>,
}

impl HandCycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Hand> {
        self.current
    }

    pub fn locked_hand(&self) -> Option<Hand> {
        self.lock
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.lock.is_none()
    }

    pub fn phase(&self) -> HandPhase {
        match (self.lock, self.current) {
            (Some(Hand::Main), _) => HandPhase::MainLocked,
            (Some(Hand::Off), _) => HandPhase::OffLocked,
            (None, Some(Hand::Main)) => HandPhase::MainActive,
            (None, Some(Hand::Off)) => HandPhase::OffActive,
            (None, None) => HandPhase::Idle,
        }
    }

    /// Hand used by the strike in progress; an idle cycle starts on the mainhand
    pub fn strike_hand(&self) -> Hand {
        self.lock.or(self.current).unwrap_or(Hand::Main)
    }

    /// Enter a strike and report its hand
    pub fn begin_strike(&mut self) -> Hand {
        let hand = self.strike_hand();
        if self.lock.is_none() {
            self.current = Some(hand);
        }
        tracing::trace!("strike begins with {:?}", hand);
        hand
    }

    /// Leave a strike, moving the cycle to the other hand unless locked
    pub fn finish_strike(&mut self) {
        if self.lock.is_none() {
            self.current = Some(self.strike_hand().opposite());
        }
    }

    /// Advance the cycle by exactly one hand without striking
    pub fn switch(&mut self) {
        if self.lock.is_some() {
            tracing::debug!("hand switch ignored while locked to {:?}", self.lock);
            return;
        }
        let next = self.current.unwrap_or(Hand::Main).opposite();
        tracing::debug!("hand switched to {:?}", next);
        self.current = Some(next);
    }

    /// Point the cycle at a hand
    pub fn set(&mut self, hand: Hand) {
        self.current = Some(hand);
    }

    /// Pin every following strike to a hand
    pub fn lock_to(&mut self, hand: Hand) {
        self.current = Some(hand);
        self.lock = Some(hand);
    }

    pub fn unlock(&mut self) {
        self.lock = None;
    }

    /// Return to idle
    pub fn reset(&mut self) {
        self.current = None;
        self.lock = None;
    }
}

/// Whether the mainhand sprite and animation apply to a plain attack strike
///
/// The name is historical: it reads true for the first (mainhand) swing.
/// Always false for combatants the player does not control.
pub fn is_second_attack(kind: CombatantKind, state: &HandCycleState) -> bool {
    kind == CombatantKind::Actor && state.strike_hand() == Hand::Main
}

/// Whether the current skill hit is the offhand hit
///
/// Always false for combatants the player does not control.
pub fn is_second_skill_hit(kind: CombatantKind, state: &HandCycleState) -> bool {
    kind == CombatantKind::Actor && state.strike_hand() == Hand::Off
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_starts_on_mainhand() {
        let mut state = HandCycleState::new();
        assert_eq!(state.phase(), HandPhase::Idle);
        assert_eq!(state.begin_strike(), Hand::Main);
        assert_eq!(state.phase(), HandPhase::MainActive);
    }

    #[test]
    fn test_strikes_alternate() {
        let mut state = HandCycleState::new();
        let mut hands = Vec::new();
        for _ in 0..4 {
            hands.push(state.begin_strike());
            state.finish_strike();
        }
        assert_eq!(hands, vec![Hand::Main, Hand::Off, Hand::Main, Hand::Off]);
    }

    #[test]
    fn test_lock_pins_and_suppresses_advance() {
        let mut state = HandCycleState::new();
        state.lock_to(Hand::Off);
        for _ in 0..3 {
            assert_eq!(state.begin_strike(), Hand::Off);
            state.finish_strike();
        }
        state.switch();
        assert_eq!(state.phase(), HandPhase::OffLocked);
        state.unlock();
        assert_eq!(state.phase(), HandPhase::OffActive);
    }

    #[test]
    fn test_relocking_replaces_lock() {
        let mut state = HandCycleState::new();
        state.lock_to(Hand::Main);
        state.lock_to(Hand::Off);
        assert_eq!(state.locked_hand(), Some(Hand::Off));
        assert_eq!(state.strike_hand(), Hand::Off);
    }

    #[test]
    fn test_switch_from_idle_moves_to_offhand() {
        let mut state = HandCycleState::new();
        state.switch();
        assert_eq!(state.current(), Some(Hand::Off));
        state.switch();
        assert_eq!(state.current(), Some(Hand::Main));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = HandCycleState::new();
        state.lock_to(Hand::Main);
        state.begin_strike();
        state.reset();
        assert!(state.is_idle());
        assert_eq!(state, HandCycleState::default());
    }

    #[test]
    fn test_presentation_queries() {
        let mut state = HandCycleState::new();
        assert!(is_second_attack(CombatantKind::Actor, &state));
        assert!(!is_second_skill_hit(CombatantKind::Actor, &state));

        state.set(Hand::Off);
        assert!(!is_second_attack(CombatantKind::Actor, &state));
        assert!(is_second_skill_hit(CombatantKind::Actor, &state));

        assert!(!is_second_attack(CombatantKind::Enemy, &HandCycleState::new()));
        assert!(!is_second_skill_hit(CombatantKind::Enemy, &state));
    }
}
