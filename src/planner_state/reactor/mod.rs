//! # Reactor Module
//!
//! The simulation core of the planner.
//!
//! ## Components
//!
//! * `block` - The block model and its variants
//! * `grid` - The bounded lattice holding every block, and the neutron line walk
//! * `pass` - The tiered Flux/Validity pass and its placement rules
//! * `analysis` - Problem-cell clusters and the reactor-wide stats
//! * `layout` - The persisted JSON form of a grid
//!
//! ## Data Flow
//!
//! 1. An edit changes the grid
//! 2. `pass::run` resets and re-derives every block's state
//! 3. Clusters and stats are computed from the settled grid

pub mod analysis;
pub mod block;
pub mod grid;
pub mod layout;
pub mod pass;
