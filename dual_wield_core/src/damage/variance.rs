//! Damage variance

use rand::Rng;

/// Spread damage by up to `variance` percent
///
/// Two uniform rolls are summed, so values near the original are the most
/// likely. The spread always moves away from zero in the damage's own sign.
pub fn apply_variance(damage: f64, variance: u32, rng: &mut impl Rng) -> f64 {
    if variance == 0 || damage == 0.0 {
        return damage;
    }
    let amp = (damage.abs() * f64::from(variance) / 100.0).max(0.0).floor();
    if amp < 1.0 {
        return damage;
    }
    let amp = amp as u64;
    let spread = rng.gen_range(0..=amp) as f64 + rng.gen_range(0..=amp) as f64 - amp as f64;
    if damage >= 0.0 {
        damage + spread
    } else {
        damage - spread
    }
}
