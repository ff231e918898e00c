//! Ghost behaviour modes and the per-level timing schedule.

/// What a ghost is currently doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GhostMode {
    InHouse,
    #[default]
    Chase,
    Scatter,
    Frightened,
    Consumed,
}

/// One entry of a level's mode timeline.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeTiming {
    pub mode: GhostMode,
    pub seconds: f32,
}

impl ModeTiming {
    pub const fn new(mode: GhostMode, seconds: f32) -> Self {
        Self { mode, seconds }
    }
}

/// Steps through a level's mode timeline.
///
/// The last entry holds forever, whatever its duration. A frightened period
/// suspends the timeline, which resumes where it stopped once the period
/// runs out.
#[derive(Clone, Debug, Default)]
pub struct ModeSchedule {
    timings: Vec<ModeTiming>,
    index: usize,
    elapsed: f32,
    frightened: Option<f32>,
}

impl ModeSchedule {
    pub fn new(timings: Vec<ModeTiming>) -> Self {
        let mut s = Self {
            timings,
            ..Self::default()
        };
        s.skip_elapsed();
        s
    }

    /// The mode in effect. An empty timeline means permanent chase.
    pub fn current(&self) -> GhostMode {
        if self.frightened.is_some() {
            return GhostMode::Frightened;
        }
        self.scheduled()
    }

    /// The timeline's mode, ignoring any frightened override.
    pub fn scheduled(&self) -> GhostMode {
        self.timings
            .get(self.index)
            .map_or(GhostMode::default(), |t| t.mode)
    }

    /// Seconds left in a frightened period, if one is running.
    pub fn frightened_left(&self) -> Option<f32> {
        self.frightened
    }

    /// Start (or restart) a frightened period.
    pub fn frighten(&mut self, seconds: f32) {
        if seconds > 0.0 {
            self.frightened = Some(seconds);
        }
    }

    /// Advance by `dt` seconds. Returns the new mode if it changed.
    pub fn tick(&mut self, dt: f32) -> Option<GhostMode> {
        let before = self.current();
        match self.frightened {
            Some(left) if left > dt => self.frightened = Some(left - dt),
            Some(left) => {
                self.frightened = None;
                self.elapsed += dt - left;
                self.skip_elapsed();
            }
            None => {
                self.elapsed += dt;
                self.skip_elapsed();
            }
        }
        let after = self.current();
        if after != before {
            log::debug!("ghost mode {before:?} -> {after:?}");
            Some(after)
        } else {
            None
        }
    }

    /// Go back to the start of the timeline (new life, new level).
    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
        self.frightened = None;
        self.skip_elapsed();
    }

    fn skip_elapsed(&mut self) {
        while self.index + 1 < self.timings.len() && self.elapsed >= self.timings[self.index].seconds
        {
            self.elapsed -= self.timings[self.index].seconds.max(0.0);
            self.index += 1;
        }
    }
}
