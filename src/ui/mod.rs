//! Presentation layer: the interactive test screen

pub mod state;
pub mod terminal;

pub use state::{ButtonKind, ButtonStatus, ScreenState, ScreenStateMachine, UiCommand, UserAction};
pub use terminal::TerminalScreen;
