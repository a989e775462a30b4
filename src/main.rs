//! # Reactor Planner Entry Point
//!
//! Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- layout.json [config.json]
//! ```

fn main() -> anyhow::Result<()> {
    reactor_planner::run()
}
