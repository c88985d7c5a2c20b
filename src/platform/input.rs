//! Input commands

use serde::{Deserialize, Serialize};

/// Ship control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// One step left (per keydown)
    MoveLeft,
    /// One step right (per keydown)
    MoveRight,
    /// One bullet (per key release)
    Fire,
}

/// Button commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiCommand {
    Play,
    /// Pause when running, resume when paused
    PauseResume,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Map a DOM-style key code (`ArrowLeft`, `Space`, ...) to a command.
///
/// Movement repeats on every keydown; firing happens on release.
pub fn map_key(code: &str, phase: KeyPhase) -> Option<Command> {
    match (code, phase) {
        ("ArrowLeft", KeyPhase::Down) => Some(Command::MoveLeft),
        ("ArrowRight", KeyPhase::Down) => Some(Command::MoveRight),
        ("Space", KeyPhase::Up) => Some(Command::Fire),
        _ => None,
    }
}
