//! Volume control
//!
//! Linear volume in `[0.0, 1.0]` with a mute flag that preserves the level.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::sanitize(level),
            muted: false,
        }
    }

    fn sanitize(level: f32) -> f32 {
        if level.is_nan() {
            1.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }

    /// Set volume level (clamped to 0.0-1.0)
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::sanitize(level);
    }

    /// Current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the stream should actually be driven at
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
