//! Ageing and expiry of live hitboxes and projectiles

use super::combat::{Attack, Projectile};

/// Age every hitbox by one tick and drop the ones that ran out
pub fn advance_attacks(attacks: &mut Vec<Attack>) {
    attacks.retain_mut(|attack| attack.update());
}

/// Move every projectile and drop the ones that left the arena
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>) {
    projectiles.retain_mut(|projectile| projectile.update());
}

/// Drop entities spent by a collision this tick
pub fn sweep(attacks: &mut Vec<Attack>, projectiles: &mut Vec<Projectile>) {
    attacks.retain(|a| a.active);
    projectiles.retain(|p| p.active);
}
