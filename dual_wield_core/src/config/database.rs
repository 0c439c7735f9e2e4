//! Database loading from JSON

use super::ConfigError;
use crate::data::{Database, RawDatabase, SkillDef};
use std::fs;
use std::path::Path;

/// Load a database from a JSON file
pub fn load_database(path: &Path) -> Result<Database, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_database(&content)
}

/// Load a database from a JSON string
pub fn parse_database(content: &str) -> Result<Database, ConfigError> {
    let raw: RawDatabase = serde_json::from_str(content)?;
    Database::from_raw(raw).map_err(|e| ConfigError::ValidationError(e.to_string()))
}

/// Get the database shipped with the crate
pub fn default_database() -> Database {
    let json = include_str!("../../config/database.json");
    parse_database(json).unwrap_or_else(|e| {
        tracing::warn!("shipped database invalid, using the basic attack only: {e}");
        let raw = RawDatabase {
            skills: vec![SkillDef::basic_attack()],
            ..RawDatabase::default()
        };
        Database::from_raw(raw).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SkillTag;
    use crate::data::MotionKind;

    #[test]
    fn test_default_database() {
        let db = default_database();
        assert!(db.weapon(3).unwrap().tag.is_two_handed());
        assert!(db.weapon(5).unwrap().tag.is_offhand_only());
        assert!(db.armor(2).unwrap().tag.is_offhand_capable);
        assert_eq!(db.skill(2).unwrap().tag, SkillTag::DualWield);
        assert_eq!(db.skill(3).unwrap().tag, SkillTag::MainhandOnly);
        assert_eq!(db.attack_motion(6).unwrap().kind, MotionKind::Missile);
        assert!(db.skill(1).unwrap().is_basic_attack());
    }

    #[test]
    fn test_parse_minimal_database() {
        let db = parse_database(r#"{ "skills": [{ "id": 1, "name": "Attack" }] }"#).unwrap();
        assert_eq!(db.bare_hand_animation_id(), 1);
        assert!(db.weapon(1).is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_database("{"), Err(ConfigError::JsonError(_))));

        let duplicate = r#"{ "skills": [
            { "id": 1, "name": "A" },
            { "id": 1, "name": "B" }
        ] }"#;
        assert!(matches!(
            parse_database(duplicate),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_database(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
