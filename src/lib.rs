//! CRT Runner - an endless-runner arcade game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character physics, spawning, collisions)
//! - `tuning`: Data-driven game balance
//! - `audio`: Music element control
//! - `renderer`: Canvas 2D draw pass (wasm only)

pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;
