//! Integer countdowns measured in fixed simulation updates.
//!
//! Every timer in the simulation (animation frame pacing, attack cooldowns,
//! spell cadence, end-of-game delays) is a decrementing update count. This
//! type owns the decrement so call sites only ask "did it fire?".

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// An expired countdown (remaining = 0).
    pub const fn expired_now() -> Self {
        Self { remaining: 0 }
    }

    pub const fn starting_at(updates: u32) -> Self {
        Self { remaining: updates }
    }

    pub fn restart(&mut self, updates: u32) {
        self.remaining = updates;
    }

    /// Advance one update. Returns `true` only on the update where the
    /// countdown reaches zero; an already expired countdown never fires again.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub const fn expired(&self) -> bool {
        self.remaining == 0
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}
