//! # Analysis Module
//!
//! Read-only reductions run after every pass: fuel cell clusters for
//! diagnostics and the reactor-wide stats snapshot.

pub mod clusters;
pub mod stats;
