//! # Heat Sink Module
//!
//! Heat sinks (and conductors, which are heat sinks without cooling) remove
//! heat from the reactor while their placement rules hold.

use crate::config::HeatSinkStats;

#[derive(Clone, Debug, PartialEq)]
pub struct HeatSink {
    cooling: f64,
    valid: bool,
}

impl HeatSink {
    pub fn new(stats: &HeatSinkStats) -> Self {
        HeatSink {
            cooling: stats.cooling,
            valid: false,
        }
    }

    /// Heat removed per tick while valid.
    pub fn cooling(&self) -> f64 {
        self.cooling
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Cooling actually contributed during the last pass.
    pub fn effective_cooling(&self) -> f64 {
        if self.valid {
            self.cooling
        } else {
            0.0
        }
    }

    pub fn revert_to_setup(&mut self) {
        self.valid = false;
    }

    pub(crate) fn reload(&mut self, stats: &HeatSinkStats) {
        self.cooling = stats.cooling;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
