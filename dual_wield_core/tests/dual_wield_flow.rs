//! Integration test: Load database -> Equip -> Attack -> Check hand state
//!
//! Walks the shipped database through full actions and checks the
//! dual-wield guarantees at every action boundary.

use dual_wield_core::prelude::*;
use dual_wield_core::eligibility::{attack_times_add, is_offhand_armed, strike_count};
use dual_wield_core::sequence::{ActionSequence, SequenceStep};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DAGGER: u32 = 1;
const SHORT_SWORD: u32 = 2;
const CLAYMORE: u32 = 3;
const KATANA: u32 = 4;
const ROUND_SHIELD: u32 = 1;

const TWIN_SLASH: u32 = 2;
const FOCUSED_THRUST: u32 = 3;
const PARRY_RIPOSTE: u32 = 4;
const FLURRY: u32 = 5;
const CROSS_STEP: u32 = 6;

const DISABLE_STATE: u32 = 13;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

fn weapon(db: &Database, id: u32) -> EquipItem {
    db.weapon(id).cloned().expect("weapon in shipped database").into()
}

fn shield(db: &Database, id: u32) -> EquipItem {
    db.armor(id).cloned().expect("armor in shipped database").into()
}

fn ninja(db: &Database) -> Combatant {
    let mut actor = Combatant::actor("Ninja")
        .with_dual_wield_slots()
        .with_level(10)
        .with_base(ParamId::MaxHp, 400.0)
        .with_base(ParamId::Attack, 50.0)
        .with_base(ParamId::Defense, 20.0);
    actor.change_equip(MAINHAND_SLOT, Some(weapon(db, SHORT_SWORD))).unwrap();
    actor.change_equip(OFFHAND_SLOT, Some(weapon(db, DAGGER))).unwrap();
    actor
}

fn ogre() -> Combatant {
    Combatant::enemy("Ogre")
        .with_base(ParamId::MaxHp, 5000.0)
        .with_base(ParamId::Attack, 30.0)
        .with_base(ParamId::Defense, 10.0)
        .with_attack_animation(12)
}

fn config() -> DualWieldConfig {
    DualWieldConfig {
        disable_state_id: DISABLE_STATE,
        ..DualWieldConfig::default()
    }
}

fn setup() -> (Battle, CombatantId, CombatantId, CombatantId) {
    let db = default_database();
    let actor = ninja(&db);
    let knight = Combatant::actor("Knight")
        .with_base(ParamId::MaxHp, 500.0)
        .with_base(ParamId::Attack, 45.0);
    let pipeline = ParamPipeline::builder().config(config()).build();

    let mut battle = Battle::new(db, pipeline);
    let ninja_id = battle.add_actor(actor);
    let knight_id = battle.add_actor(knight);
    let ogre_id = battle.add_enemy(ogre());
    battle.start();
    (battle, ninja_id, knight_id, ogre_id)
}

fn assert_all_idle(battle: &Battle) {
    for combatant in battle.party().iter().chain(battle.troop()) {
        assert!(
            combatant.hand().is_idle(),
            "{} kept hand state {:?}",
            combatant.name,
            combatant.hand().phase()
        );
    }
}

#[test]
fn test_two_handed_mainhand_flips_dual_wielding() {
    separator("TWO-HANDED MAINHAND");
    let db = default_database();
    let mut actor = ninja(&db);
    let battle = BattleContext::IN_BATTLE;

    assert!(is_effectively_dual_wielding(&actor, battle));
    let states_before = actor.states.clone();

    let released = actor.change_equip(MAINHAND_SLOT, Some(weapon(&db, CLAYMORE))).unwrap();
    println!("  Released: {:?}", released.iter().map(EquipItem::name).collect::<Vec<_>>());
    assert!(!is_effectively_dual_wielding(&actor, battle));
    assert_eq!(actor.states, states_before);
    assert!(actor.hand().is_idle());

    // The offhand dagger was released, so putting a one-hander back restores dual-wielding
    actor.change_equip(MAINHAND_SLOT, Some(weapon(&db, SHORT_SWORD))).unwrap();
    assert!(is_effectively_dual_wielding(&actor, battle));
    assert!(is_offhand_armed(&actor));
}

#[test]
fn test_attack_uses_mainhand_then_offhand_and_resets_everyone() {
    separator("ATTACK ACTION");
    let (mut battle, ninja_id, knight_id, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let main = battle.hand_power(ninja_id, Hand::Main).unwrap();
    let off = battle.hand_power(ninja_id, Hand::Off).unwrap();
    println!("  Mainhand power: {main}, offhand power: {off}");
    // 50 + (24 - 10), 50 * 0.75 + (24 - 14)
    assert!((main - 64.0).abs() < f64::EPSILON);
    assert!((off - 48.0).abs() < f64::EPSILON);

    // Leave stale state on bystanders; the barrier must clear it
    battle.combatant_mut(knight_id).unwrap().hand_mut().lock_to(Hand::Off);
    battle.combatant_mut(ogre_id).unwrap().hand_mut().set(Hand::Off);

    let outcome = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();
    println!("  {}", outcome.summary());

    assert_eq!(outcome.hands(), vec![Some(Hand::Main), Some(Hand::Off)]);
    let attacks: Vec<f64> = outcome.strikes().map(|s| s.attack).collect();
    assert_eq!(attacks, vec![main, off]);
    assert_all_idle(&battle);
}

#[test]
fn test_attack_presentation_per_hand() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let outcome = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();

    let motions: Vec<StrikePresentationView> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Motion { presentation, .. } => Some(StrikePresentationView {
                hand: presentation.hand,
                wtype_id: presentation.wtype_id,
                animation_id: presentation.animation_id,
                second_attack: presentation.second_attack,
            }),
            _ => None,
        })
        .collect();

    assert_eq!(
        motions,
        vec![
            StrikePresentationView {
                hand: Some(Hand::Main),
                wtype_id: 2,
                animation_id: 6,
                second_attack: true,
            },
            StrikePresentationView {
                hand: Some(Hand::Off),
                wtype_id: 1,
                animation_id: 16,
                second_attack: false,
            },
        ]
    );
}

#[derive(Debug, PartialEq)]
struct StrikePresentationView {
    hand: Option<Hand>,
    wtype_id: u32,
    animation_id: u32,
    second_attack: bool,
}

#[test]
fn test_bare_offhand_power_is_finite() {
    let db = default_database();
    let mut actor = ninja(&db);
    actor.unequip(OFFHAND_SLOT).unwrap();

    let pipeline = ParamPipeline::default();
    let off = pipeline.offhand_power(&actor, BattleContext::IN_BATTLE);
    assert!(off.is_finite());
    // 50 * 0.75 + (14 - 14)
    assert!((off - 38.0).abs() < f64::EPSILON);

    let bare = Combatant::actor("Monk").with_dual_wield_slots();
    let power = pipeline.offhand_power(&bare, BattleContext::IN_BATTLE);
    assert!(power.is_finite());
    assert!(power >= bare.params.min(ParamId::Attack));
}

#[test]
fn test_mainhand_skill_keeps_hand_parity() {
    separator("MAINHAND SKILL");
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let main = battle.hand_power(ninja_id, Hand::Main).unwrap();

    // Mid-cycle on the offhand, the skill must still read the mainhand
    battle.combatant_mut(ninja_id).unwrap().hand_mut().set(Hand::Off);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let outcome = battle
        .execute_action(&Action::skill(ninja_id, FOCUSED_THRUST, [ogre_id]), &mut rng)
        .unwrap();
    println!("  {}", outcome.summary());
    assert_eq!(outcome.hands(), vec![Some(Hand::Main)]);
    assert!(outcome.strikes().all(|s| (s.attack - main).abs() < f64::EPSILON));
    assert_all_idle(&battle);

    // The following plain attack starts on the mainhand as usual
    let attack = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();
    assert_eq!(attack.hands(), vec![Some(Hand::Main), Some(Hand::Off)]);
}

#[test]
fn test_offhand_skill_reads_offhand() {
    let (mut battle, ninja_id, knight_id, ogre_id) = setup();
    let off = battle.hand_power(ninja_id, Hand::Off).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let outcome = battle
        .execute_action(&Action::skill(ninja_id, PARRY_RIPOSTE, [ogre_id]), &mut rng)
        .unwrap();
    assert_eq!(outcome.hands(), vec![Some(Hand::Off)]);
    assert!(outcome.strikes().all(|s| (s.attack - off).abs() < f64::EPSILON));

    // Without two weapon slots the skill falls back to the overall attack
    let knight_outcome = battle
        .execute_action(&Action::skill(knight_id, PARRY_RIPOSTE, [ogre_id]), &mut rng)
        .unwrap();
    assert_eq!(knight_outcome.hands(), vec![None]);
    let knight_attack = knight_outcome.strikes().next().unwrap().attack;
    assert!((knight_attack - 45.0).abs() < f64::EPSILON);
    assert_all_idle(&battle);
}

#[test]
fn test_repeat_per_hand_duplicates_for_dual_wielder_only() {
    let mut sequence = ActionSequence::new(
        std::iter::repeat(SequenceStep::ActionEffect)
            .take(4)
            .chain(std::iter::repeat(SequenceStep::Wait { frames: 1 }).take(4)),
    );
    assert_eq!(sequence.repeat_per_hand(6, true), 6);
    assert_eq!(sequence.remaining(), 8 + 1 + 6);
    assert_eq!(sequence.steps().nth(6), Some(&SequenceStep::SwitchHand));

    let mut unchanged = ActionSequence::new(std::iter::repeat(SequenceStep::ActionEffect).take(8));
    assert_eq!(unchanged.repeat_per_hand(6, false), 0);
    assert_eq!(unchanged.remaining(), 8);
}

#[test]
fn test_scripted_dual_wield_skill() {
    separator("SCRIPTED SKILL");
    let (mut battle, ninja_id, knight_id, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let outcome = battle
        .execute_action(&Action::skill(ninja_id, TWIN_SLASH, [ogre_id]), &mut rng)
        .unwrap();
    println!("  {}", outcome.summary());
    assert!(outcome.events.contains(&BattleEvent::Repeated {
        requested: 3,
        duplicated: 3
    }));
    assert_eq!(outcome.hands(), vec![Some(Hand::Main), Some(Hand::Off)]);

    // Same skill from a single-weapon actor runs the block once
    let knight_outcome = battle
        .execute_action(&Action::skill(knight_id, TWIN_SLASH, [ogre_id]), &mut rng)
        .unwrap();
    assert!(knight_outcome.events.contains(&BattleEvent::Repeated {
        requested: 3,
        duplicated: 0
    }));
    assert_eq!(knight_outcome.strike_count(), 1);
    assert_all_idle(&battle);
}

#[test]
fn test_handwritten_sequence_with_switch() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let outcome = battle
        .execute_action(&Action::skill(ninja_id, CROSS_STEP, [ogre_id]), &mut rng)
        .unwrap();
    assert_eq!(outcome.hands(), vec![Some(Hand::Main), Some(Hand::Off)]);
    assert_all_idle(&battle);
}

#[test]
fn test_multi_hit_skill_alternates_hands() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let outcome = battle
        .execute_action(&Action::skill(ninja_id, FLURRY, [ogre_id]), &mut rng)
        .unwrap();
    assert_eq!(
        outcome.hands(),
        vec![Some(Hand::Main), Some(Hand::Off), Some(Hand::Main)]
    );

    // An odd hit count must not carry the offhand into the next action
    let next = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();
    assert_eq!(next.hands(), vec![Some(Hand::Main), Some(Hand::Off)]);
}

#[test]
fn test_disable_state_forces_single_mainhand_strike() {
    separator("DISABLE STATE");
    let (mut battle, ninja_id, _, ogre_id) = setup();
    battle.combatant_mut(ninja_id).unwrap().add_state(DISABLE_STATE);

    let actor = battle.combatant(ninja_id).unwrap();
    assert!(is_effectively_dual_wielding(actor, battle.context()));
    assert_eq!(attack_times_add(actor, battle.context(), battle.config()), 0);
    assert_eq!(strike_count(actor, battle.context(), battle.config()), 1);

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let outcome = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();
    assert_eq!(outcome.hands(), vec![Some(Hand::Main)]);

    let twin = battle
        .execute_action(&Action::skill(ninja_id, TWIN_SLASH, [ogre_id]), &mut rng)
        .unwrap();
    assert_eq!(twin.hands(), vec![Some(Hand::Main)]);
}

#[test]
fn test_equip_round_trip_is_stateless() {
    let db = default_database();
    let pipeline = ParamPipeline::default();
    let battle = BattleContext::IN_BATTLE;
    let mut actor = ninja(&db);

    let main_before = pipeline.mainhand_power(&actor, battle);
    let off_before = pipeline.offhand_power(&actor, battle);

    actor.unequip(MAINHAND_SLOT).unwrap();
    actor.unequip(OFFHAND_SLOT).unwrap();
    actor.change_equip(MAINHAND_SLOT, Some(weapon(&db, SHORT_SWORD))).unwrap();
    actor.change_equip(OFFHAND_SLOT, Some(weapon(&db, DAGGER))).unwrap();

    assert!((pipeline.mainhand_power(&actor, battle) - main_before).abs() < f64::EPSILON);
    assert!((pipeline.offhand_power(&actor, battle) - off_before).abs() < f64::EPSILON);
}

#[test]
fn test_dead_target_skips_remaining_strikes() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    battle.combatant_mut(ogre_id).unwrap().hp = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let outcome = battle.execute_action(&Action::attack(ninja_id, ogre_id), &mut rng).unwrap();
    assert_eq!(outcome.strike_count(), 1);
    assert!(outcome.killed_any());
    assert!(outcome
        .events
        .contains(&BattleEvent::Skipped { target: ogre_id }));
    assert_all_idle(&battle);
}

#[test]
fn test_enemy_attack_reports_no_hand() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let outcome = battle.execute_action(&Action::attack(ogre_id, ninja_id), &mut rng).unwrap();
    assert_eq!(outcome.hands(), vec![None]);
    assert!(!battle.is_second_attack(ogre_id));
    assert!(!battle.is_second_skill_hit(ogre_id));

    let animation = outcome.events.iter().find_map(|e| match e {
        BattleEvent::Animation { animation_id, .. } => Some(*animation_id),
        _ => None,
    });
    assert_eq!(animation, Some(12));
}

#[test]
fn test_equip_slot_legality_from_database() {
    let db = default_database();
    let mut actor = Combatant::actor("Samurai").with_dual_wield_slots();
    let katana = weapon(&db, KATANA);
    let main_gauche = weapon(&db, 5);

    assert!(actor.can_equip_in_slot(MAINHAND_SLOT, &katana));
    assert!(!actor.can_equip_in_slot(OFFHAND_SLOT, &katana));
    assert!(!actor.can_equip_in_slot(MAINHAND_SLOT, &main_gauche));
    assert!(actor.can_equip_in_slot(OFFHAND_SLOT, &main_gauche));
    assert!(actor.can_equip_in_slot(OFFHAND_SLOT, &shield(&db, ROUND_SHIELD)));

    actor.change_equip(MAINHAND_SLOT, Some(weapon(&db, CLAYMORE))).unwrap();
    assert!(!actor.can_equip_in_slot(OFFHAND_SLOT, &shield(&db, ROUND_SHIELD)));
    assert!(actor.can_equip_in_slot(OFFHAND_SLOT, &shield(&db, 2)));
    assert!(matches!(
        actor.change_equip(OFFHAND_SLOT, Some(main_gauche)),
        Err(EquipError::IllegalSlot { .. })
    ));
}

#[test]
fn test_status_outside_battle() {
    let (mut battle, ninja_id, _, _) = setup();
    battle
        .combatant_mut(ninja_id)
        .unwrap()
        .change_equip(OFFHAND_SLOT, Some(shield(&default_database(), ROUND_SHIELD)))
        .unwrap();

    let in_battle = battle.status(ninja_id).unwrap();
    assert!(!in_battle.dual_wielding);
    assert_eq!(in_battle.strikes, 1);

    battle.end();
    let field = battle.status(ninja_id).unwrap();
    assert!(field.dual_wielding);
    assert!(!field.offhand_armed);
}

#[test]
fn test_each_target_takes_both_hands() {
    separator("MULTI-TARGET ATTACK");
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let second_ogre = battle.add_enemy(ogre());
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    let outcome = battle
        .execute_action(
            &Action::skill(ninja_id, dual_wield_core::types::BASIC_ATTACK_SKILL_ID, [ogre_id, second_ogre]),
            &mut rng,
        )
        .unwrap();
    println!("  {}", outcome.summary());

    let order: Vec<(CombatantId, Option<Hand>)> = outcome.strikes().map(|s| (s.target, s.hand)).collect();
    assert_eq!(
        order,
        vec![
            (ogre_id, Some(Hand::Main)),
            (ogre_id, Some(Hand::Off)),
            (second_ogre, Some(Hand::Main)),
            (second_ogre, Some(Hand::Off)),
        ]
    );
    assert_all_idle(&battle);
}

#[test]
fn test_dead_first_target_still_lets_second_take_both_hands() {
    let (mut battle, ninja_id, _, ogre_id) = setup();
    let second_ogre = battle.add_enemy(ogre());
    battle.combatant_mut(ogre_id).unwrap().hp = 0.0;
    let mut rng = ChaCha8Rng::seed_from_u64(22);

    let outcome = battle
        .execute_action(&Action::skill(ninja_id, 1, [ogre_id, second_ogre]), &mut rng)
        .unwrap();
    assert_eq!(outcome.events.first(), Some(&BattleEvent::Skipped { target: ogre_id }));
    let order: Vec<(CombatantId, Option<Hand>)> = outcome.strikes().map(|s| (s.target, s.hand)).collect();
    assert_eq!(
        order,
        vec![(second_ogre, Some(Hand::Main)), (second_ogre, Some(Hand::Off))]
    );
}

#[test]
fn test_offhand_skill_with_two_handed_mainhand_uses_full_attack() {
    separator("OFFHAND SKILL WITH A TWO-HANDER");
    let db = default_database();
    let mut berserker = Combatant::actor("Berserker")
        .with_dual_wield_slots()
        .with_base(ParamId::MaxHp, 400.0)
        .with_base(ParamId::Attack, 50.0);
    berserker.change_equip(MAINHAND_SLOT, Some(weapon(&db, CLAYMORE))).unwrap();

    let mut battle = Battle::new(db, ParamPipeline::builder().config(config()).build());
    let berserker_id = battle.add_actor(berserker);
    let ogre_id = battle.add_enemy(ogre());
    battle.start();

    let overall = {
        let user = battle.combatant(berserker_id).unwrap();
        battle.pipeline().param(user, ParamId::Attack, battle.context())
    };
    // 50 * 1.5 + 32
    assert!((overall - 107.0).abs() < f64::EPSILON);

    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let outcome = battle
        .execute_action(&Action::skill(berserker_id, PARRY_RIPOSTE, [ogre_id]), &mut rng)
        .unwrap();
    println!("  {}", outcome.summary());
    let strike = outcome.strikes().next().unwrap();
    assert_eq!(strike.hand, None);
    assert!((strike.attack - overall).abs() < f64::EPSILON);

    // The claymore stays on screen for the whole lock window
    let shown: Vec<u32> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Motion { presentation, .. } => Some(presentation.wtype_id),
            _ => None,
        })
        .collect();
    assert_eq!(shown, vec![2]);
    assert_all_idle(&battle);
}
