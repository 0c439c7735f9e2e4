//! Action sequences - scripted steps executed by a single action
//!
//! A skill's sequence is written as text lines (`motion attack: user`,
//! `wait: 12`, `repeat per hand: 6`, ...) in the database and parsed once at
//! load. At execution time the steps are consumed front to back from an
//! [`ActionSequence`]; `repeat per hand` rewrites the remaining steps in
//! place.

use crate::types::Hand;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single scripted step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceStep {
    /// Play the attack motion of the hand currently in use
    MotionAttack,
    /// Play the battle animation of the hand currently in use on the targets
    AttackAnimation,
    /// Evaluate the damage formula against every target
    ActionEffect,
    /// Presentation wait, in frames
    Wait { frames: u32 },
    /// Advance the hand counter by one (companion of `RepeatPerHand`)
    SwitchHand,
    /// Point the hand counter at a hand
    SetHand { hand: Hand },
    /// Pin every following strike to a hand until unlocked
    LockHand { hand: Hand },
    /// Release a lock
    UnlockHand,
    /// Clear the hand counter and any lock
    ResetHand,
    /// Repeat the next `steps` steps once more with the opposite hand
    RepeatPerHand { steps: usize },
    /// Any other command, forwarded to the presentation layer untouched
    Custom { command: String },
}

/// Failure to parse a sequence line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceParseError {
    #[error("empty sequence line")]
    Empty,
    #[error("invalid argument '{argument}' for '{command}'")]
    InvalidArgument { command: String, argument: String },
}

fn parse_hand(command: &str, argument: &str) -> Result<Hand, SequenceParseError> {
    match argument.to_ascii_lowercase().as_str() {
        "main" | "mainhand" => Ok(Hand::Main),
        "off" | "offhand" => Ok(Hand::Off),
        _ => Err(SequenceParseError::InvalidArgument {
            command: command.to_string(),
            argument: argument.to_string(),
        }),
    }
}

fn parse_count<T: FromStr>(command: &str, argument: &str) -> Result<T, SequenceParseError> {
    argument
        .parse::<T>()
        .map_err(|_| SequenceParseError::InvalidArgument {
            command: command.to_string(),
            argument: argument.to_string(),
        })
}

impl FromStr for SequenceStep {
    type Err = SequenceParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(SequenceParseError::Empty);
        }

        let (command, argument) = match line.split_once(':') {
            Some((c, a)) => (c.trim(), a.trim()),
            None => (line, ""),
        };
        let key = command.to_ascii_uppercase();

        let step = match key.as_str() {
            "MOTION ATTACK" => SequenceStep::MotionAttack,
            "ATTACK ANIMATION" => SequenceStep::AttackAnimation,
            "ACTION EFFECT" => SequenceStep::ActionEffect,
            "WAIT" => SequenceStep::Wait {
                frames: parse_count(command, argument)?,
            },
            "REPEAT PER HAND" | "DUALWIELD ACTION" => SequenceStep::RepeatPerHand {
                steps: parse_count(command, argument)?,
            },
            "SWITCH HAND" | "ADVANCE HAND" => SequenceStep::SwitchHand,
            "SET HAND" => SequenceStep::SetHand {
                hand: parse_hand(command, argument)?,
            },
            "LOCK HAND" => SequenceStep::LockHand {
                hand: parse_hand(command, argument)?,
            },
            "UNLOCK HAND" => SequenceStep::UnlockHand,
            "RESET HAND" => SequenceStep::ResetHand,
            _ => SequenceStep::Custom {
                command: line.to_string(),
            },
        };
        Ok(step)
    }
}

impl fmt::Display for SequenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceStep::MotionAttack => write!(f, "motion attack"),
            SequenceStep::AttackAnimation => write!(f, "attack animation"),
            SequenceStep::ActionEffect => write!(f, "action effect"),
            SequenceStep::Wait { frames } => write!(f, "wait: {}", frames),
            SequenceStep::SwitchHand => write!(f, "switch hand"),
            SequenceStep::SetHand { hand } => write!(f, "set hand: {:?}", hand),
            SequenceStep::LockHand { hand } => write!(f, "lock hand: {:?}", hand),
            SequenceStep::UnlockHand => write!(f, "unlock hand"),
            SequenceStep::ResetHand => write!(f, "reset hand"),
            SequenceStep::RepeatPerHand { steps } => write!(f, "repeat per hand: {}", steps),
            SequenceStep::Custom { command } => write!(f, "{}", command),
        }
    }
}

/// Parse a list of sequence lines, skipping blank ones
pub fn parse_sequence<S: AsRef<str>>(lines: &[S]) -> Result<Vec<SequenceStep>, SequenceParseError> {
    lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// The pending steps of an action in progress
#[derive(Debug, Clone, Default)]
pub struct ActionSequence {
    steps: VecDeque<SequenceStep>,
}

impl ActionSequence {
    /// Create a sequence from steps
    pub fn new(steps: impl IntoIterator<Item = SequenceStep>) -> Self {
        ActionSequence {
            steps: steps.into_iter().collect(),
        }
    }

    /// Take the next step
    pub fn next_step(&mut self) -> Option<SequenceStep> {
        self.steps.pop_front()
    }

    /// Number of steps still pending
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pending steps in execution order
    pub fn steps(&self) -> impl Iterator<Item = &SequenceStep> {
        self.steps.iter()
    }

    /// Duplicate the next `count` steps behind a hand switch
    ///
    /// `count` is clamped to the pending steps. Does nothing when `enabled`
    /// is false. Returns the number of steps duplicated.
    pub fn repeat_per_hand(&mut self, count: usize, enabled: bool) -> usize {
        if !enabled {
            return 0;
        }
        let count = count.min(self.steps.len());
        if count < 1 {
            return 0;
        }

        let block: Vec<SequenceStep> = self.steps.iter().take(count).cloned().collect();
        let mut insert_at = count;
        self.steps.insert(insert_at, SequenceStep::SwitchHand);
        for step in block {
            insert_at += 1;
            self.steps.insert(insert_at, step);
        }

        tracing::debug!("repeat per hand duplicated {} steps", count);
        count
    }
}
