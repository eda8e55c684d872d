//! Fighter state and the per-tick character state machine

use serde::{Deserialize, Serialize};

use super::combat::AttackKind;
use super::physics::{PhysicsSystem, Rect, GROUND_Y, JUMP_FORCE, MOVE_SPEED};
use super::spawner::{ActionSpawner, Spawned};
use super::timer::Countdown;
use super::{Controls, PlayerId};

/// Fighter box width
pub const CHARACTER_WIDTH: f32 = 40.0;
/// Fighter box height
pub const CHARACTER_HEIGHT: f32 = 60.0;
/// Starting and maximum health
pub const MAX_HEALTH: i32 = 100;

/// Ticks between animation frame advances
const ANIMATION_TICKS_PER_FRAME: u8 = 10;
/// Animation frames per cycle
const ANIMATION_FRAMES: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

/// What the fighter is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Idle,
    Walk,
    Jump,
    Punch,
    Kick,
    Special,
    Hit,
}

impl From<AttackKind> for ActionState {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Punch => ActionState::Punch,
            AttackKind::Kick => ActionState::Kick,
        }
    }
}

/// Cosmetic animation cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationPhase {
    pub frame: u8,
    pub timer: u8,
}

impl AnimationPhase {
    fn advance(&mut self) {
        self.timer += 1;
        if self.timer >= ANIMATION_TICKS_PER_FRAME {
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
            self.timer = 0;
        }
    }
}

/// Fighter state (authoritative)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub player: PlayerId,

    // Position and movement
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub is_grounded: bool,

    // Combat
    pub health: i32,
    pub max_health: i32,
    pub state: ActionState,
    pub attack_cooldown: u32,
    pub hit_cooldown: u32,
    pub block_stun: u32,
    pub is_attacking: bool,
    pub is_blocking: bool,
    pub combo: u32,

    pub animation: AnimationPhase,
}

impl Character {
    pub fn new(player: PlayerId, x: f32, y: f32, facing: Facing) -> Self {
        Self {
            player,
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            facing,
            is_grounded: true,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            state: ActionState::Idle,
            attack_cooldown: 0,
            hit_cooldown: 0,
            block_stun: 0,
            is_attacking: false,
            is_blocking: false,
            combo: 0,
            animation: AnimationPhase::default(),
        }
    }

    /// Fresh fighter at the seat's spawn point
    pub fn spawn(player: PlayerId) -> Self {
        match player {
            PlayerId::Player1 => Self::new(player, 150.0, GROUND_Y, Facing::Right),
            PlayerId::Player2 => Self::new(player, 600.0, GROUND_Y, Facing::Left),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Locked out of input by a block stun or hit-lock
    pub fn is_stunned(&self) -> bool {
        self.block_stun.is_running() || self.hit_cooldown.is_running()
    }

    /// Launch the fighter with a knockback impulse
    pub fn knock_back(&mut self, vel_x: f32, vel_y: f32) {
        self.vel_x = vel_x;
        self.vel_y = vel_y;
        self.is_grounded = false;
    }

    /// Advance one tick.
    ///
    /// Precedence is stun/hit-lock, then attack-lock, then free movement.
    /// Returns the hitbox or projectile spawned this tick, if any.
    pub fn update(&mut self, controls: &Controls, opponent_x: f32) -> Option<Spawned> {
        self.attack_cooldown.tick_down();
        self.hit_cooldown.tick_down();
        self.block_stun.tick_down();
        self.animation.advance();

        self.is_blocking = controls.block && self.is_grounded && !self.is_attacking;

        if self.is_stunned() {
            self.state = ActionState::Hit;
            self.release_attack_lock();
            self.apply_gravity();
            return None;
        }

        self.apply_movement(controls);

        if controls.up && self.is_grounded && !self.is_attacking {
            self.vel_y = JUMP_FORCE;
            self.is_grounded = false;
            self.state = ActionState::Jump;
        }

        let spawned = self.trigger_action(controls);

        if self.is_attacking {
            self.vel_x = 0.0;
            if self.release_attack_lock() {
                self.state = ActionState::Idle;
            }
        }

        if !self.is_attacking && self.is_grounded {
            self.facing = if opponent_x < self.x {
                Facing::Left
            } else {
                Facing::Right
            };
        }

        self.x += self.vel_x;
        self.apply_gravity();
        self.x = PhysicsSystem::clamp_to_arena(self.x, self.width);

        spawned
    }

    fn apply_movement(&mut self, controls: &Controls) {
        let free = !self.is_attacking && !self.is_blocking;

        if controls.left && free {
            self.vel_x = -MOVE_SPEED;
            self.facing = Facing::Left;
            if self.is_grounded {
                self.state = ActionState::Walk;
            }
        } else if controls.right && free {
            self.vel_x = MOVE_SPEED;
            self.facing = Facing::Right;
            if self.is_grounded {
                self.state = ActionState::Walk;
            }
        } else {
            self.vel_x = PhysicsSystem::apply_friction(self.vel_x);
            if self.is_grounded && free {
                self.state = ActionState::Idle;
            }
        }
    }

    /// Punch beats kick beats special when several are held
    fn trigger_action(&mut self, controls: &Controls) -> Option<Spawned> {
        if self.attack_cooldown.is_running() || !self.is_grounded || self.is_attacking {
            return None;
        }

        if controls.punch {
            Some(Spawned::Attack(ActionSpawner::perform_attack(self, AttackKind::Punch)))
        } else if controls.kick {
            Some(Spawned::Attack(ActionSpawner::perform_attack(self, AttackKind::Kick)))
        } else if controls.special {
            Some(Spawned::Projectile(ActionSpawner::perform_special(self)))
        } else {
            None
        }
    }

    /// Clear the attack lock once its counter has run out.
    /// Returns true if the lock was released this call.
    fn release_attack_lock(&mut self) -> bool {
        if self.is_attacking && !self.attack_cooldown.is_running() {
            self.is_attacking = false;
            true
        } else {
            false
        }
    }

    fn apply_gravity(&mut self) {
        if self.is_grounded {
            return;
        }

        let (y, vel_y, landed) = PhysicsSystem::fall(self.y, self.vel_y);
        self.y = y;
        self.vel_y = vel_y;

        if landed {
            self.is_grounded = true;
            if !self.is_attacking {
                self.state = ActionState::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::physics::ARENA_WIDTH;

    fn held(f: impl FnOnce(&mut Controls)) -> Controls {
        let mut controls = Controls::default();
        f(&mut controls);
        controls
    }

    #[test]
    fn spawn_positions_and_facing() {
        let p1 = Character::spawn(PlayerId::Player1);
        let p2 = Character::spawn(PlayerId::Player2);
        assert_eq!((p1.x, p1.y, p1.facing), (150.0, 500.0, Facing::Right));
        assert_eq!((p2.x, p2.y, p2.facing), (600.0, 500.0, Facing::Left));
        assert_eq!(p1.health, 100);
        assert_eq!(p1.state, ActionState::Idle);
        assert!(p1.is_grounded);
    }

    #[test]
    fn walking_left_moves_and_faces_left_until_auto_facing() {
        let mut c = Character::spawn(PlayerId::Player1);
        let controls = held(|c| c.left = true);

        // Opponent to the right: auto-facing overrides the walk direction
        c.update(&controls, 600.0);
        assert_eq!(c.x, 145.0);
        assert_eq!(c.state, ActionState::Walk);
        assert_eq!(c.facing, Facing::Right);

        // Opponent to the left: facing agrees with the walk
        c.update(&controls, 0.0);
        assert_eq!(c.facing, Facing::Left);
        assert_eq!(c.x, 140.0);
    }

    #[test]
    fn releasing_input_decays_velocity_to_idle() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.update(&held(|c| c.right = true), 600.0);
        assert_eq!(c.vel_x, 5.0);

        c.update(&Controls::default(), 600.0);
        assert_eq!(c.vel_x, 4.0);
        assert_eq!(c.state, ActionState::Idle);

        for _ in 0..40 {
            c.update(&Controls::default(), 600.0);
        }
        assert_eq!(c.vel_x, 0.0);
    }

    #[test]
    fn jump_rises_then_lands() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.update(&held(|c| c.up = true), 600.0);
        assert!(!c.is_grounded);
        assert_eq!(c.state, ActionState::Jump);
        assert!(c.y < GROUND_Y);

        let mut ticks = 0;
        while !c.is_grounded {
            c.update(&Controls::default(), 600.0);
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        assert_eq!(c.y, GROUND_Y);
        assert_eq!(c.vel_y, 0.0);
        assert_eq!(c.state, ActionState::Idle);
    }

    #[test]
    fn cannot_attack_while_airborne() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.update(&held(|c| c.up = true), 600.0);
        let spawned = c.update(&held(|c| c.punch = true), 600.0);
        assert!(spawned.is_none());
        assert!(!c.is_attacking);
    }

    #[test]
    fn punch_locks_for_twenty_ticks() {
        let mut c = Character::spawn(PlayerId::Player1);
        let punch = held(|c| c.punch = true);

        let spawned = c.update(&punch, 600.0);
        assert!(matches!(spawned, Some(Spawned::Attack(_))));
        assert!(c.is_attacking);
        assert_eq!(c.attack_cooldown, 20);
        assert_eq!(c.state, ActionState::Punch);

        for expected in (1..20).rev() {
            let spawned = c.update(&punch, 600.0);
            assert!(spawned.is_none());
            assert_eq!(c.attack_cooldown, expected);
            assert!(c.is_attacking);
        }

        c.update(&Controls::default(), 600.0);
        assert_eq!(c.attack_cooldown, 0);
        assert!(!c.is_attacking);
        assert_eq!(c.state, ActionState::Idle);

        // Free again: the next punch fires
        assert!(c.update(&punch, 600.0).is_some());
    }

    #[test]
    fn attacking_freezes_horizontal_motion() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.update(&held(|c| c.right = true), 600.0);
        c.update(
            &held(|c| {
                c.right = true;
                c.kick = true;
            }),
            600.0,
        );
        assert!(c.is_attacking);
        assert_eq!(c.vel_x, 0.0);

        let x = c.x;
        for _ in 0..10 {
            c.update(&held(|c| c.left = true), 600.0);
            assert_eq!(c.vel_x, 0.0);
            assert_eq!(c.x, x);
        }
    }

    #[test]
    fn punch_has_priority_over_kick_and_special() {
        let mut c = Character::spawn(PlayerId::Player1);
        let all = held(|c| {
            c.punch = true;
            c.kick = true;
            c.special = true;
        });
        match c.update(&all, 600.0) {
            Some(Spawned::Attack(attack)) => assert_eq!(attack.kind, AttackKind::Punch),
            other => panic!("expected a punch, got {:?}", other),
        }

        let mut c = Character::spawn(PlayerId::Player1);
        let kick_special = held(|c| {
            c.kick = true;
            c.special = true;
        });
        match c.update(&kick_special, 600.0) {
            Some(Spawned::Attack(attack)) => assert_eq!(attack.kind, AttackKind::Kick),
            other => panic!("expected a kick, got {:?}", other),
        }
    }

    #[test]
    fn blocking_requires_ground_and_prevents_walking() {
        let mut c = Character::spawn(PlayerId::Player1);
        let block_left = held(|c| {
            c.block = true;
            c.left = true;
        });
        c.update(&block_left, 600.0);
        assert!(c.is_blocking);
        assert_eq!(c.x, 150.0);

        let mut airborne = Character::spawn(PlayerId::Player1);
        airborne.update(&held(|c| c.up = true), 600.0);
        airborne.update(&held(|c| c.block = true), 600.0);
        assert!(!airborne.is_blocking);
    }

    #[test]
    fn stun_overrides_input() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.hit_cooldown = 5;
        let x = c.x;
        for remaining in (0..5).rev() {
            let spawned = c.update(&held(|c| {
                c.right = true;
                c.punch = true;
            }), 600.0);
            assert_eq!(c.hit_cooldown, remaining);
            if remaining > 0 {
                assert!(spawned.is_none());
                assert_eq!(c.state, ActionState::Hit);
                assert_eq!(c.x, x);
            }
        }
    }

    #[test]
    fn stun_keeps_knockback_velocity_but_applies_gravity() {
        let mut c = Character::spawn(PlayerId::Player2);
        c.hit_cooldown = 20;
        c.knock_back(15.0, -5.0);

        c.update(&Controls::default(), 150.0);
        assert_eq!(c.state, ActionState::Hit);
        assert_eq!(c.x, 600.0);
        assert_eq!(c.vel_x, 15.0);
        assert!(c.y < GROUND_Y);
    }

    #[test]
    fn attack_lock_expiring_during_stun_is_released() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.update(&held(|c| c.punch = true), 600.0);
        c.hit_cooldown = 30;

        for _ in 0..25 {
            c.update(&Controls::default(), 600.0);
            assert!(!c.is_attacking || c.attack_cooldown > 0);
        }
        assert!(!c.is_attacking);
        assert_eq!(c.state, ActionState::Hit);
    }

    #[test]
    fn position_is_clamped_to_arena() {
        let mut c = Character::spawn(PlayerId::Player1);
        c.x = 2.0;
        c.update(&held(|c| c.left = true), 600.0);
        assert_eq!(c.x, 0.0);

        let mut c = Character::spawn(PlayerId::Player2);
        c.x = ARENA_WIDTH - c.width - 1.0;
        c.update(&held(|c| c.right = true), 0.0);
        assert_eq!(c.x, ARENA_WIDTH - c.width);
    }

    #[test]
    fn animation_cycles_every_ten_ticks() {
        let mut c = Character::spawn(PlayerId::Player1);
        for _ in 0..10 {
            c.update(&Controls::default(), 600.0);
        }
        assert_eq!(c.animation.frame, 1);
        for _ in 0..30 {
            c.update(&Controls::default(), 600.0);
        }
        assert_eq!(c.animation.frame, 0);
    }
}
