//! Action spawner - turns attack triggers into hitboxes and projectiles

use super::character::{ActionState, Character, Facing};
use super::combat::{Attack, AttackKind, AttackStats, Projectile, ProjectileKind, SpecialStats};

/// Transient entity produced by a fighter this tick
#[derive(Debug, Clone, PartialEq)]
pub enum Spawned {
    Attack(Attack),
    Projectile(Projectile),
}

pub struct ActionSpawner;

impl ActionSpawner {
    /// Lock the fighter into a melee attack and build its hitbox in front of it
    pub fn perform_attack(character: &mut Character, kind: AttackKind) -> Attack {
        let stats = AttackStats::for_kind(kind);

        character.is_attacking = true;
        character.state = ActionState::from(kind);
        character.attack_cooldown = stats.cooldown;

        let offset_x = match character.facing {
            Facing::Right => character.width,
            Facing::Left => -stats.width,
        };

        Attack {
            x: character.x + offset_x,
            y: character.y + character.height / 2.0,
            width: stats.width,
            height: stats.height,
            damage: stats.damage,
            owner: character.player,
            kind,
            active: true,
            duration: stats.duration,
        }
    }

    /// Lock the fighter into its special and launch a projectile from its leading edge
    pub fn perform_special(character: &mut Character) -> Projectile {
        character.is_attacking = true;
        character.state = ActionState::Special;
        character.attack_cooldown = SpecialStats::COOLDOWN;

        let (x, vel_x) = match character.facing {
            Facing::Right => (character.x + character.width, SpecialStats::SPEED),
            Facing::Left => (character.x, -SpecialStats::SPEED),
        };

        Projectile {
            x,
            y: character.y + character.height / 2.0,
            vel_x,
            vel_y: 0.0,
            width: SpecialStats::SIZE,
            height: SpecialStats::SIZE,
            damage: SpecialStats::DAMAGE,
            owner: character.player,
            kind: ProjectileKind::for_player(character.player),
            animation_frame: 0,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlayerId;

    #[test]
    fn punch_facing_right_spawns_in_front() {
        let mut c = Character::spawn(PlayerId::Player1);
        let attack = ActionSpawner::perform_attack(&mut c, AttackKind::Punch);

        assert_eq!(attack.x, 190.0);
        assert_eq!(attack.y, 530.0);
        assert_eq!((attack.width, attack.height), (30.0, 20.0));
        assert_eq!(attack.damage, 5);
        assert_eq!(attack.duration, 5);
        assert!(attack.active);
        assert_eq!(attack.owner, PlayerId::Player1);

        assert!(c.is_attacking);
        assert_eq!(c.state, ActionState::Punch);
        assert_eq!(c.attack_cooldown, 20);
    }

    #[test]
    fn kick_facing_left_spawns_behind_origin() {
        let mut c = Character::spawn(PlayerId::Player2);
        let attack = ActionSpawner::perform_attack(&mut c, AttackKind::Kick);

        assert_eq!(attack.x, 560.0);
        assert_eq!((attack.width, attack.height), (40.0, 30.0));
        assert_eq!(attack.damage, 8);
        assert_eq!(c.attack_cooldown, 30);
        assert_eq!(c.state, ActionState::Kick);
    }

    #[test]
    fn special_launches_from_leading_edge() {
        let mut p1 = Character::spawn(PlayerId::Player1);
        let projectile = ActionSpawner::perform_special(&mut p1);
        assert_eq!(projectile.x, 190.0);
        assert_eq!(projectile.vel_x, 8.0);
        assert_eq!(projectile.damage, 15);
        assert_eq!(projectile.kind, ProjectileKind::Spiral);
        assert_eq!(p1.attack_cooldown, 60);
        assert_eq!(p1.state, ActionState::Special);

        let mut p2 = Character::spawn(PlayerId::Player2);
        let projectile = ActionSpawner::perform_special(&mut p2);
        assert_eq!(projectile.x, 600.0);
        assert_eq!(projectile.vel_x, -8.0);
        assert_eq!(projectile.kind, ProjectileKind::Bolt);
    }
}
