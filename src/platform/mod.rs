//! Platform abstraction layer
//!
//! Maps raw key events onto the abstract commands the game understands.

pub mod input;

pub use input::{Command, KeyPhase, UiCommand, map_key};
