//! Game modes and the policies that choose between them.
//!
//! [`BalancedPolicy`] is what the widget uses by default: it forces whichever
//! mode has been played less and only flips a coin on a tie. [`RandomPolicy`]
//! is the plain coin flip.

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Which mini-game a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Click the bouncing / flying ball three times.
    Projectile,
    /// Catch the falling ball three times before it lands.
    DropCatch,
}

impl Mode {
    /// Banner text shown while the mode is announced.
    #[must_use]
    pub fn announcement(self) -> &'static str {
        match self {
            Self::Projectile => "Click the moving ball!",
            Self::DropCatch => "Catch the falling ball!",
        }
    }
}

/// Chooses the mode for the next session.
pub trait ModePolicy {
    fn choose(&mut self, rng: &mut dyn RngCore) -> Mode;
}

/// Uniformly random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl ModePolicy for RandomPolicy {
    fn choose(&mut self, rng: &mut dyn RngCore) -> Mode {
        coin_flip(rng)
    }
}

/// Always plays the same mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub Mode);

impl ModePolicy for FixedPolicy {
    fn choose(&mut self, _rng: &mut dyn RngCore) -> Mode {
        self.0
    }
}

/// Keeps the two modes evenly played over the lifetime of the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedPolicy {
    pub projectile_count: u32,
    pub drop_catch_count: u32,
}

impl ModePolicy for BalancedPolicy {
    fn choose(&mut self, rng: &mut dyn RngCore) -> Mode {
        let mode = match self.drop_catch_count.cmp(&self.projectile_count) {
            std::cmp::Ordering::Less => Mode::DropCatch,
            std::cmp::Ordering::Greater => Mode::Projectile,
            std::cmp::Ordering::Equal => coin_flip(rng),
        };
        match mode {
            Mode::Projectile => self.projectile_count += 1,
            Mode::DropCatch => self.drop_catch_count += 1,
        }
        mode
    }
}

fn coin_flip(rng: &mut dyn RngCore) -> Mode {
    if rng.random_bool(0.5) { Mode::Projectile } else { Mode::DropCatch }
}
