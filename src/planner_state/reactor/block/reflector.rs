//! # Reflector Module
//!
//! Reflectors send a neutron line back along itself. They only count as a
//! source when they sit within half the neutron reach of the walk's origin;
//! further away they simply block the line.

use crate::config::ReflectorStats;

#[derive(Clone, Debug, PartialEq)]
pub struct Reflector {
    efficiency: f64,
    reflectivity: f64,
    valid: bool,
}

impl Reflector {
    pub fn new(stats: &ReflectorStats) -> Self {
        Reflector {
            efficiency: stats.efficiency,
            reflectivity: stats.reflectivity,
            valid: false,
        }
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Fraction of the incoming flux sent back down the line.
    pub fn reflectivity(&self) -> f64 {
        self.reflectivity
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn revert_to_setup(&mut self) {
        self.valid = false;
    }

    pub(crate) fn reload(&mut self, stats: &ReflectorStats) {
        self.efficiency = stats.efficiency;
        self.reflectivity = stats.reflectivity;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
