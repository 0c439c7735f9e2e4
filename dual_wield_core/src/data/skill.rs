//! Skill definitions

use crate::classify::{classify_skill, SkillTag};
use crate::formula::Formula;
use crate::sequence::{parse_sequence, SequenceParseError, SequenceStep};
use crate::types::{DamageKind, Hand, SkillId, BASIC_ATTACK_SKILL_ID};
use serde::{Deserialize, Serialize};

/// Damage section of a skill
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageDef {
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub formula: Formula,
    /// Random spread in percent of the result
    #[serde(default)]
    pub variance: u32,
}

/// Steps a skill runs around its target sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillSteps {
    pub setup: Vec<SequenceStep>,
    pub target: Vec<SequenceStep>,
    pub finish: Vec<SequenceStep>,
}

/// A skill as loaded from the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub damage: DamageDef,
    /// Times the default sequence strikes each target
    #[serde(default = "default_repeats")]
    pub repeats: u32,
    /// Scripted target sequence, one command per line; empty uses the default
    #[serde(default)]
    pub sequence: Vec<String>,
    #[serde(default)]
    pub note: String,
    /// Computed from `note` when the database is built
    #[serde(skip)]
    pub tag: SkillTag,
    /// Computed from `sequence` and `tag` when the database is built
    #[serde(skip)]
    pub steps: SkillSteps,
}

fn default_repeats() -> u32 {
    1
}

impl SkillDef {
    /// Create an untagged damage skill
    pub fn new(id: SkillId, name: impl Into<String>, formula: impl Into<Formula>) -> Self {
        SkillDef {
            id,
            name: name.into(),
            damage: DamageDef {
                kind: DamageKind::HpDamage,
                formula: formula.into(),
                variance: 0,
            },
            repeats: default_repeats(),
            sequence: Vec::new(),
            note: String::new(),
            tag: SkillTag::None,
            steps: SkillSteps::default(),
        }
    }

    /// The engine's default attack skill
    pub fn basic_attack() -> Self {
        SkillDef::new(BASIC_ATTACK_SKILL_ID, "Attack", "a.atk * 4 - b.def * 2")
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_kind(mut self, kind: DamageKind) -> Self {
        self.damage.kind = kind;
        self
    }

    pub fn with_variance(mut self, variance: u32) -> Self {
        self.damage.variance = variance;
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_sequence<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.sequence = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Classify the note and build the setup, target and finish steps
    pub fn prepare(&mut self) -> Result<(), SequenceParseError> {
        self.tag = classify_skill(&self.note);
        self.steps = SkillSteps {
            setup: Vec::new(),
            target: parse_sequence(&self.sequence)?,
            finish: Vec::new(),
        };

        match self.tag {
            SkillTag::MainhandOnly => self.inject_lock(Hand::Main),
            SkillTag::OffhandOnly => self.inject_lock(Hand::Off),
            SkillTag::DualWield => self.steps.setup.insert(0, SequenceStep::ResetHand),
            SkillTag::None => {}
        }
        Ok(())
    }

    /// Builder form of [`SkillDef::prepare`]
    pub fn prepared(mut self) -> Result<Self, SequenceParseError> {
        self.prepare()?;
        Ok(self)
    }

    fn inject_lock(&mut self, hand: Hand) {
        self.steps.setup.insert(0, SequenceStep::LockHand { hand });
        self.steps.target.push(SequenceStep::UnlockHand);
        self.steps.finish.push(SequenceStep::ResetHand);
    }

    pub fn is_basic_attack(&self) -> bool {
        self.id == BASIC_ATTACK_SKILL_ID
    }

    /// Whether a scripted sequence replaces the default strikes
    pub fn has_sequence(&self) -> bool {
        !self.steps.target.is_empty()
            && self
                .steps
                .target
                .iter()
                .any(|s| !matches!(s, SequenceStep::UnlockHand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_mainhand_skill_injects_lock() {
        let skill = SkillDef::new(10, "Jab", "a.atk * 2")
            .with_note("<Mainhand Skill>")
            .prepared()
            .unwrap();
        assert_eq!(skill.tag, SkillTag::MainhandOnly);
        assert_eq!(skill.steps.setup, vec![SequenceStep::LockHand { hand: Hand::Main }]);
        assert_eq!(skill.steps.target, vec![SequenceStep::UnlockHand]);
        assert_eq!(skill.steps.finish, vec![SequenceStep::ResetHand]);
        assert!(!skill.has_sequence());
    }

    #[test]
    fn test_prepare_offhand_skill_appends_after_sequence() {
        let skill = SkillDef::new(11, "Parry Strike", "a.atk")
            .with_note("<Offhand Skill>")
            .with_sequence(["motion attack: user", "action effect: target"])
            .prepared()
            .unwrap();
        assert_eq!(skill.steps.setup[0], SequenceStep::LockHand { hand: Hand::Off });
        assert_eq!(skill.steps.target.last(), Some(&SequenceStep::UnlockHand));
        assert_eq!(skill.steps.target.len(), 3);
        assert!(skill.has_sequence());
    }

    #[test]
    fn test_prepare_dual_wield_skill() {
        let skill = SkillDef::new(12, "Twin Slash", "a.atk * 3")
            .with_note("<Dualwield Skill>")
            .with_sequence(["repeat per hand: 2", "motion attack: user", "action effect: target"])
            .prepared()
            .unwrap();
        assert_eq!(skill.tag, SkillTag::DualWield);
        assert_eq!(skill.steps.setup, vec![SequenceStep::ResetHand]);
        assert_eq!(skill.steps.target[0], SequenceStep::RepeatPerHand { steps: 2 });
    }

    #[test]
    fn test_prepare_rejects_bad_sequence() {
        let mut skill = SkillDef::new(13, "Broken", "1").with_sequence(["wait: forever"]);
        assert!(skill.prepare().is_err());
    }

    #[test]
    fn test_basic_attack() {
        let skill = SkillDef::basic_attack();
        assert!(skill.is_basic_attack());
        assert!(skill.damage.formula.is_valid());
    }

    #[test]
    fn test_deserialize_skill() {
        let json = r#"{
            "id": 20,
            "name": "Cross Cut",
            "damage": { "kind": "hp_damage", "formula": "a.atk * 3", "variance": 20 },
            "note": "<Dualwield Skill>"
        }"#;
        let mut skill: SkillDef = serde_json::from_str(json).unwrap();
        skill.prepare().unwrap();
        assert_eq!(skill.repeats, 1);
        assert_eq!(skill.damage.variance, 20);
        assert_eq!(skill.tag, SkillTag::DualWield);
    }
}
