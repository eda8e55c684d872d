//! Arena geometry, gravity and overlap tests

use serde::{Deserialize, Serialize};

/// Arena width in pixels
pub const ARENA_WIDTH: f32 = 800.0;
/// Arena height in pixels
pub const ARENA_HEIGHT: f32 = 600.0;
/// Resting y of a grounded character's top edge
pub const GROUND_Y: f32 = 500.0;
/// Added to vertical velocity each airborne tick
pub const GRAVITY: f32 = 0.8;
/// Vertical impulse of a jump (negative is up)
pub const JUMP_FORCE: f32 = -18.0;
/// Horizontal walking speed per tick
pub const MOVE_SPEED: f32 = 5.0;
/// Horizontal velocity retained per tick with no directional input
pub const FRICTION: f32 = 0.8;
/// Below this magnitude horizontal velocity snaps to zero
pub const VELOCITY_SNAP: f32 = 0.1;
/// Distance past either arena edge a projectile may travel before expiring
pub const OFFSCREEN_MARGIN: f32 = 50.0;

/// Axis-aligned box, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Physics helpers for fighters and projectiles
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Horizontal decay with no directional input
    pub fn apply_friction(vel_x: f32) -> f32 {
        let decayed = vel_x * FRICTION;
        if decayed.abs() < VELOCITY_SNAP {
            0.0
        } else {
            decayed
        }
    }

    /// One airborne step. Returns (new_y, new_vel_y, landed)
    pub fn fall(y: f32, vel_y: f32) -> (f32, f32, bool) {
        let new_vel_y = vel_y + GRAVITY;
        let new_y = y + new_vel_y;

        if new_y >= GROUND_Y {
            (GROUND_Y, 0.0, true)
        } else {
            (new_y, new_vel_y, false)
        }
    }

    /// Keep a box of the given width inside [0, ARENA_WIDTH]
    pub fn clamp_to_arena(x: f32, width: f32) -> f32 {
        x.max(0.0).min(ARENA_WIDTH - width)
    }

    /// Has x left the arena plus its margin on either side
    pub fn is_offscreen(x: f32) -> bool {
        x < -OFFSCREEN_MARGIN || x > ARENA_WIDTH + OFFSCREEN_MARGIN
    }
}
