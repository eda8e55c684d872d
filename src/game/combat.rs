//! Combat system - attack stats, hitboxes, projectiles and hit resolution

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::character::Character;
use super::physics::{PhysicsSystem, Rect};
use super::round::RoundEndCause;
use super::timer::Countdown;
use super::PlayerId;

/// Melee attack kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Punch,
    Kick,
}

/// Melee stats per attack kind
#[derive(Debug, Clone, Copy)]
pub struct AttackStats {
    /// Damage on an unblocked hit
    pub damage: i32,
    /// Ticks the attacker stays locked, which is also the cooldown to the next attack
    pub cooldown: u32,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Ticks the hitbox stays live
    pub duration: u32,
}

impl AttackStats {
    pub fn for_kind(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Punch => Self {
                damage: 5,
                cooldown: 20,
                width: 30.0,
                height: 20.0,
                duration: 5,
            },
            AttackKind::Kick => Self {
                damage: 8,
                cooldown: 30,
                width: 40.0,
                height: 30.0,
                duration: 5,
            },
        }
    }
}

/// Projectile kinds. They differ only in how a renderer draws them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Spiral,
    Bolt,
}

impl ProjectileKind {
    /// Each seat throws its own kind
    pub fn for_player(player: PlayerId) -> Self {
        match player {
            PlayerId::Player1 => ProjectileKind::Spiral,
            PlayerId::Player2 => ProjectileKind::Bolt,
        }
    }
}

/// Special move (projectile) stats
pub struct SpecialStats;

impl SpecialStats {
    pub const DAMAGE: i32 = 15;
    pub const COOLDOWN: u32 = 60;
    pub const SPEED: f32 = 8.0;
    pub const SIZE: f32 = 30.0;
    /// Animation phase wraps at this many frames
    pub const ANIMATION_FRAMES: u8 = 8;
}

/// Block and hit reactions
pub struct HitReaction;

impl HitReaction {
    pub const ATTACK_BLOCK_STUN: u32 = 10;
    pub const ATTACK_HIT_COOLDOWN: u32 = 20;
    pub const ATTACK_KNOCKBACK_X: f32 = 15.0;
    pub const ATTACK_KNOCKBACK_Y: f32 = -5.0;

    pub const PROJECTILE_BLOCK_STUN: u32 = 15;
    pub const PROJECTILE_HIT_COOLDOWN: u32 = 30;
    pub const PROJECTILE_KNOCKBACK_X: f32 = 20.0;
    pub const PROJECTILE_KNOCKBACK_Y: f32 = -8.0;
    /// Share of projectile damage that goes through a block
    pub const CHIP_DAMAGE_PERCENT: i32 = 30;
}

/// Live melee hitbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub damage: i32,
    pub owner: PlayerId,
    pub kind: AttackKind,
    pub active: bool,
    /// Ticks left before the hitbox is removed
    pub duration: u32,
}

impl Attack {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Age by one tick, returns false once expired
    pub fn update(&mut self) -> bool {
        self.duration.tick_down();
        if !self.duration.is_running() {
            self.active = false;
        }
        self.active
    }

    /// Spend the hitbox after it connects
    pub fn expire(&mut self) {
        self.duration = 0;
        self.active = false;
    }
}

/// Live projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
    pub damage: i32,
    pub owner: PlayerId,
    pub kind: ProjectileKind,
    pub animation_frame: u8,
    pub active: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Advance one tick, returns false once it has left the arena
    pub fn update(&mut self) -> bool {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.animation_frame = (self.animation_frame + 1) % SpecialStats::ANIMATION_FRAMES;

        if PhysicsSystem::is_offscreen(self.x) {
            self.active = false;
        }
        self.active
    }
}

/// Game events emitted during a tick (for renderer effects and logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Melee hitbox spawned
    AttackStarted {
        player: PlayerId,
        kind: AttackKind,
        x: f32,
        y: f32,
    },

    /// Projectile thrown
    ProjectileLaunched {
        player: PlayerId,
        kind: ProjectileKind,
        x: f32,
        y: f32,
        vel_x: f32,
    },

    /// Unblocked hit landed
    Hit {
        attacker: PlayerId,
        target: PlayerId,
        damage: i32,
        combo: u32,
        projectile: bool,
    },

    /// Hit absorbed by a block (damage is chip damage, possibly zero)
    Blocked {
        attacker: PlayerId,
        target: PlayerId,
        damage: i32,
        projectile: bool,
    },

    /// A fighter's health reached zero
    Knockout { loser: PlayerId },

    /// Round finished
    RoundOver {
        winner: PlayerId,
        cause: RoundEndCause,
    },
}

/// Outcome of one overlap between a hitbox/projectile and its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Blocked,
    Hit,
    /// Target still in hit-cooldown from an earlier hit
    Ignored,
}

/// Collision and damage resolution
pub struct CombatSystem;

impl CombatSystem {
    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: i32, damage: i32) -> (i32, bool) {
        let new_health = (current_health - damage).max(0);
        (new_health, new_health == 0)
    }

    /// Damage a blocked projectile still deals
    pub fn chip_damage(damage: i32) -> i32 {
        damage * HitReaction::CHIP_DAMAGE_PERCENT / 100
    }

    /// Knockback direction follows the attacker's seat, not relative position
    fn knockback_sign(attacker: PlayerId) -> f32 {
        match attacker {
            PlayerId::Player1 => 1.0,
            PlayerId::Player2 => -1.0,
        }
    }

    /// Melee hitbox against its target
    pub fn resolve_attack(attack: &Attack, target: &mut Character) -> Contact {
        if target.is_blocking {
            target.block_stun = HitReaction::ATTACK_BLOCK_STUN;
            target.combo = 0;
            Contact::Blocked
        } else if !target.hit_cooldown.is_running() {
            let (health, _) = Self::apply_damage(target.health, attack.damage);
            target.health = health;
            target.hit_cooldown = HitReaction::ATTACK_HIT_COOLDOWN;
            target.combo += 1;
            target.knock_back(
                Self::knockback_sign(attack.owner) * HitReaction::ATTACK_KNOCKBACK_X,
                HitReaction::ATTACK_KNOCKBACK_Y,
            );
            Contact::Hit
        } else {
            Contact::Ignored
        }
    }

    /// Projectile against its target
    pub fn resolve_projectile(projectile: &Projectile, target: &mut Character) -> Contact {
        if target.is_blocking {
            target.block_stun = HitReaction::PROJECTILE_BLOCK_STUN;
            let (health, _) = Self::apply_damage(target.health, Self::chip_damage(projectile.damage));
            target.health = health;
            Contact::Blocked
        } else if !target.hit_cooldown.is_running() {
            let (health, _) = Self::apply_damage(target.health, projectile.damage);
            target.health = health;
            target.hit_cooldown = HitReaction::PROJECTILE_HIT_COOLDOWN;
            target.knock_back(
                Self::knockback_sign(projectile.owner) * HitReaction::PROJECTILE_KNOCKBACK_X,
                HitReaction::PROJECTILE_KNOCKBACK_Y,
            );
            Contact::Hit
        } else {
            Contact::Ignored
        }
    }

    /// Resolve every live hitbox and projectile against the opposing fighter.
    ///
    /// Anything that overlaps its target is spent regardless of outcome.
    /// After the first knockout the remaining overlaps are still spent but
    /// change nothing. Returns the knocked-out fighter, if any.
    pub fn resolve(
        fighters: &mut [Character; 2],
        attacks: &mut [Attack],
        projectiles: &mut [Projectile],
        events: &mut Vec<GameEvent>,
    ) -> Option<PlayerId> {
        let mut knockout: Option<PlayerId> = None;

        for attack in attacks.iter_mut().filter(|a| a.active) {
            let target_id = attack.owner.opponent();
            let target = &mut fighters[target_id.index()];
            if !attack.rect().overlaps(&target.rect()) {
                continue;
            }

            if knockout.is_none() {
                let before = target.health;
                let contact = Self::resolve_attack(attack, target);
                Self::record(contact, attack.owner, target, before - target.health, false, events);
                if target.health == 0 {
                    knockout = Some(target_id);
                }
            }
            attack.expire();
        }

        for projectile in projectiles.iter_mut().filter(|p| p.active) {
            let target_id = projectile.owner.opponent();
            let target = &mut fighters[target_id.index()];
            if !projectile.rect().overlaps(&target.rect()) {
                continue;
            }

            if knockout.is_none() {
                let before = target.health;
                let contact = Self::resolve_projectile(projectile, target);
                Self::record(contact, projectile.owner, target, before - target.health, true, events);
                if target.health == 0 {
                    knockout = Some(target_id);
                }
            }
            projectile.active = false;
        }

        if let Some(loser) = knockout {
            events.push(GameEvent::Knockout { loser });
        }
        knockout
    }

    fn record(
        contact: Contact,
        attacker: PlayerId,
        target: &Character,
        damage: i32,
        projectile: bool,
        events: &mut Vec<GameEvent>,
    ) {
        match contact {
            Contact::Hit => {
                debug!(
                    attacker = %attacker,
                    target = %target.player,
                    damage,
                    health = target.health,
                    combo = target.combo,
                    "Hit landed"
                );
                events.push(GameEvent::Hit {
                    attacker,
                    target: target.player,
                    damage,
                    combo: target.combo,
                    projectile,
                });
            }
            Contact::Blocked => {
                debug!(attacker = %attacker, target = %target.player, damage, "Hit blocked");
                events.push(GameEvent::Blocked {
                    attacker,
                    target: target.player,
                    damage,
                    projectile,
                });
            }
            Contact::Ignored => {}
        }
    }
}
