//! Battle Sim - A scripted battle demonstrating dual_wield_core
//!
//! This runner shows:
//! - Loading the database and dual-wield settings (shipped or from disk)
//! - Equipping a dual-wielder, a two-hander and a sword-and-board knight
//! - Per-hand attack power and eligibility answers
//! - Plain attacks, hand-forced skills and scripted dual-wield skills
//!
//! Usage: `battle_sim [database.json] [dual_wield.toml]`
//! Set `RUST_LOG=dual_wield_core=debug` to trace hand changes.

use dual_wield_core::config::{load_database, load_dual_wield_config};
use dual_wield_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

const SHORT_SWORD: u32 = 2;
const DAGGER: u32 = 1;
const CLAYMORE: u32 = 3;
const ROUND_SHIELD: u32 = 1;

const ATTACK: u32 = 1;
const TWIN_SLASH: u32 = 2;
const FOCUSED_THRUST: u32 = 3;
const PARRY_RIPOSTE: u32 = 4;
const FLURRY: u32 = 5;

fn load_inputs() -> Result<(Database, DualWieldConfig), String> {
    let mut args = std::env::args().skip(1);
    let database = match args.next() {
        Some(path) => load_database(Path::new(&path)).map_err(|e| format!("{path}: {e}"))?,
        None => default_database(),
    };
    let config = match args.next() {
        Some(path) => load_dual_wield_config(Path::new(&path)).map_err(|e| format!("{path}: {e}"))?,
        None => DualWieldConfig::shipped(),
    };
    Ok((database, config))
}

/// Equip a database item, logging instead of failing the demo
fn equip(combatant: &mut Combatant, slot: usize, item: Option<EquipItem>) {
    let Some(item) = item else {
        tracing::warn!("{}: item for slot {} missing from database", combatant.name, slot);
        return;
    };
    if let Err(e) = combatant.change_equip(slot, Some(item)) {
        tracing::warn!("{}: {}", combatant.name, e);
    }
}

fn build_party(db: &Database) -> Vec<Combatant> {
    let weapon = |id| db.weapon(id).cloned().map(EquipItem::from);
    let armor = |id| db.armor(id).cloned().map(EquipItem::from);

    let mut ninja = Combatant::actor("Ninja")
        .with_dual_wield_slots()
        .with_level(12)
        .with_base(ParamId::MaxHp, 420.0)
        .with_base(ParamId::Attack, 52.0)
        .with_base(ParamId::Defense, 24.0)
        .with_base(ParamId::Agility, 60.0);
    equip(&mut ninja, MAINHAND_SLOT, weapon(SHORT_SWORD));
    equip(&mut ninja, OFFHAND_SLOT, weapon(DAGGER));

    let mut berserker = Combatant::actor("Berserker")
        .with_dual_wield_slots()
        .with_level(12)
        .with_base(ParamId::MaxHp, 560.0)
        .with_base(ParamId::Attack, 58.0)
        .with_base(ParamId::Defense, 20.0);
    equip(&mut berserker, MAINHAND_SLOT, weapon(CLAYMORE));

    let mut knight = Combatant::actor("Knight")
        .with_level(12)
        .with_base(ParamId::MaxHp, 620.0)
        .with_base(ParamId::Attack, 48.0)
        .with_base(ParamId::Defense, 40.0);
    equip(&mut knight, MAINHAND_SLOT, weapon(SHORT_SWORD));
    equip(&mut knight, OFFHAND_SLOT, armor(ROUND_SHIELD));

    vec![ninja, berserker, knight]
}

fn build_troop() -> Vec<Combatant> {
    vec![
        Combatant::enemy("Ogre")
            .with_base(ParamId::MaxHp, 2400.0)
            .with_base(ParamId::Attack, 70.0)
            .with_base(ParamId::Defense, 30.0)
            .with_attack_animation(12),
        Combatant::enemy("Goblin")
            .with_base(ParamId::MaxHp, 300.0)
            .with_base(ParamId::Attack, 35.0)
            .with_base(ParamId::Defense, 12.0),
    ]
}

fn print_sheet(battle: &Battle, id: CombatantId) {
    let (Some(combatant), Some(status)) = (battle.combatant(id), battle.status(id)) else {
        return;
    };
    let main = battle.hand_power(id, Hand::Main).unwrap_or(0.0);
    let off = battle.hand_power(id, Hand::Off).unwrap_or(0.0);
    println!(
        "  {:<10} main {:>4}  off {:>4}  dual-wielding: {:<5}  strikes: {}",
        combatant.name, main, off, status.dual_wielding, status.strikes
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (database, config) = match load_inputs() {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let party = build_party(&database);
    let pipeline = ParamPipeline::builder().config(config).build();
    let mut battle = Battle::new(database, pipeline);
    let party: Vec<CombatantId> = party.into_iter().map(|c| battle.add_actor(c)).collect();
    let troop: Vec<CombatantId> = build_troop().into_iter().map(|c| battle.add_enemy(c)).collect();
    let (ninja, berserker, knight) = (party[0], party[1], party[2]);
    let (ogre, goblin) = (troop[0], troop[1]);

    battle.start();
    println!("== Party ==");
    for &id in &party {
        print_sheet(&battle, id);
    }

    let script = [
        Action::attack(ninja, ogre),
        Action::attack(berserker, ogre),
        Action::attack(knight, goblin),
        Action::skill(ninja, TWIN_SLASH, [ogre]),
        Action::skill(ninja, FOCUSED_THRUST, [goblin]),
        Action::skill(ninja, PARRY_RIPOSTE, [ogre]),
        Action::skill(ninja, FLURRY, [ogre, goblin]),
        Action::skill(knight, TWIN_SLASH, [ogre]),
        Action::skill(ogre, ATTACK, [ninja]),
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    println!("\n== Turn ==");
    for action in &script {
        let name = battle
            .combatant(action.user)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let skill = battle
            .database()
            .skill(action.skill_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        match battle.execute_action(action, &mut rng) {
            Ok(outcome) => println!("  {name} uses {skill}: {}", outcome.summary()),
            Err(e) => println!("  {name} cannot use {skill}: {e}"),
        }
    }

    println!("\n== Troop ==");
    for &id in &troop {
        if let Some(enemy) = battle.combatant(id) {
            println!("  {:<10} HP {:>6}", enemy.name, enemy.hp);
        }
    }
    battle.end();
}
