//! Frame-count countdowns
//!
//! Cooldowns, stuns, hit-lock and attack lifetimes all share one rule:
//! subtract one per simulated tick and stop at zero.

/// A counter measured in simulation ticks
pub trait Countdown {
    /// Decrement by one tick, floored at zero
    fn tick_down(&mut self);

    /// True while the countdown has ticks left
    fn is_running(&self) -> bool;
}

impl Countdown for u32 {
    fn tick_down(&mut self) {
        *self = self.saturating_sub(1);
    }

    fn is_running(&self) -> bool {
        *self > 0
    }
}
