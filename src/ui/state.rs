//! Screen state machine for the interactive test screen
//!
//! Pure state: no I/O and no clock. The terminal front end feeds it user
//! actions and progress snapshots, renders whatever it exposes, and forwards
//! the [`UiCommand`]s it returns to the orchestrator.

use crate::orchestrator::{ProgressSnapshot, RunPhase};
use crate::types::{RunSequence, TestMode};
use serde::Serialize;
use std::path::PathBuf;

/// Ticks a button ignores further presses after being pressed
pub const BUTTON_COOLDOWN_TICKS: u32 = 20;
/// A pressed button looks pressed until its cooldown drops to this value
pub const CLICK_RELEASE_TICKS: u32 = 5;

pub const WELCOME_MESSAGE: &str = "Welcome to the Uniserve Data Collection Tool";
pub const TESTING_MESSAGE: &str = "Currently running tests. This can take up to five minutes for \
    the quick test and up to twenty minutes for the full test, so please do not exit the program \
    even if it appears frozen or unresponsive.";
pub const COMPLETE_MESSAGE: &str = "Testing is complete. You can now exit the program and email \
    the file containing the test results to customercare@uniserve.com";
pub const FAILED_MESSAGE: &str = "Testing finished, but the results could not be saved. \
    Please contact customercare@uniserve.com for help.";

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenState {
    Welcome,
    Testing,
    Complete,
    Failed,
}

impl ScreenState {
    pub fn message(&self) -> &'static str {
        match self {
            ScreenState::Welcome => WELCOME_MESSAGE,
            ScreenState::Testing => TESTING_MESSAGE,
            ScreenState::Complete => COMPLETE_MESSAGE,
            ScreenState::Failed => FAILED_MESSAGE,
        }
    }
}

/// Visual status of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonStatus {
    Hidden,
    Default,
    Highlighted,
    Clicked,
}

/// Actions offered on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonKind {
    QuickTest,
    FullTest,
    NetworkReset,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 3] =
        [ButtonKind::QuickTest, ButtonKind::FullTest, ButtonKind::NetworkReset];

    pub fn label(&self) -> &'static str {
        match self {
            ButtonKind::QuickTest => "Quick Test",
            ButtonKind::FullTest => "Full Test",
            ButtonKind::NetworkReset => "Network Reset",
        }
    }

    /// Key the terminal front end binds to this button
    pub fn shortcut(&self) -> char {
        match self {
            ButtonKind::QuickTest => '1',
            ButtonKind::FullTest => '2',
            ButtonKind::NetworkReset => '3',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.shortcut() == key)
    }

    /// Sequence this button starts
    pub fn sequence(&self) -> RunSequence {
        match self {
            ButtonKind::QuickTest => RunSequence::Diagnostic(TestMode::Basic),
            ButtonKind::FullTest => RunSequence::Diagnostic(TestMode::Comprehensive),
            ButtonKind::NetworkReset => RunSequence::Maintenance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub kind: ButtonKind,
    pub status: ButtonStatus,
    pub cooldown: u32,
}

impl Button {
    fn new(kind: ButtonKind) -> Self {
        Self {
            kind,
            status: ButtonStatus::Default,
            cooldown: 0,
        }
    }

    fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.status == ButtonStatus::Clicked && self.cooldown <= CLICK_RELEASE_TICKS {
            self.status = ButtonStatus::Default;
        }
    }
}

/// Input from the user or the frame clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Pointer (or selection) moved onto a button
    Highlight(ButtonKind),
    /// Pointer left every button
    ClearHighlight,
    Press(ButtonKind),
    /// One frame elapsed
    Tick,
}

/// Request for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Start(RunSequence),
}

/// Drives which message and buttons are shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenStateMachine {
    screen: ScreenState,
    buttons: Vec<Button>,
    report_path: Option<PathBuf>,
    failure: Option<String>,
}

impl Default for ScreenStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenStateMachine {
    pub fn new() -> Self {
        Self {
            screen: ScreenState::Welcome,
            buttons: ButtonKind::ALL.into_iter().map(Button::new).collect(),
            report_path: None,
            failure: None,
        }
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn message(&self) -> &'static str {
        self.screen.message()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button(&self, kind: ButtonKind) -> Option<&Button> {
        self.buttons.iter().find(|button| button.kind == kind)
    }

    /// Report saved by the last run, once on the complete screen
    pub fn report_path(&self) -> Option<&PathBuf> {
        self.report_path.as_ref()
    }

    /// Why the last report is missing, once on the failed screen
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Apply one user action; returns a command when a run should start
    pub fn handle(&mut self, action: UserAction) -> Option<UiCommand> {
        match action {
            UserAction::Tick => {
                self.buttons.iter_mut().for_each(Button::tick);
                None
            }
            UserAction::Highlight(kind) => {
                for button in &mut self.buttons {
                    match button.status {
                        ButtonStatus::Default if button.kind == kind => {
                            button.status = ButtonStatus::Highlighted
                        }
                        ButtonStatus::Highlighted if button.kind != kind => {
                            button.status = ButtonStatus::Default
                        }
                        _ => {}
                    }
                }
                None
            }
            UserAction::ClearHighlight => {
                for button in &mut self.buttons {
                    if button.status == ButtonStatus::Highlighted {
                        button.status = ButtonStatus::Default;
                    }
                }
                None
            }
            UserAction::Press(kind) => self.press(kind),
        }
    }

    fn press(&mut self, kind: ButtonKind) -> Option<UiCommand> {
        if self.screen == ScreenState::Testing {
            return None;
        }

        let button = self.buttons.iter_mut().find(|button| button.kind == kind)?;
        if button.status == ButtonStatus::Hidden || button.cooldown > 0 {
            return None;
        }

        button.cooldown = BUTTON_COOLDOWN_TICKS;
        button.status = ButtonStatus::Clicked;
        self.enter_testing();
        Some(UiCommand::Start(kind.sequence()))
    }

    /// Follow the orchestrator's progress
    pub fn observe(&mut self, snapshot: &ProgressSnapshot) {
        match snapshot.phase {
            RunPhase::Idle => {}
            RunPhase::Running => {
                if self.screen != ScreenState::Testing {
                    self.enter_testing();
                }
            }
            RunPhase::Complete => {
                self.report_path = snapshot.report_path.clone();
                self.failure = None;
                self.leave_testing(ScreenState::Complete);
            }
            RunPhase::Failed => {
                self.report_path = None;
                self.failure = snapshot.error.clone();
                self.leave_testing(ScreenState::Failed);
            }
        }
    }

    fn enter_testing(&mut self) {
        self.screen = ScreenState::Testing;
        self.report_path = None;
        self.failure = None;
        for button in &mut self.buttons {
            button.status = ButtonStatus::Hidden;
        }
    }

    fn leave_testing(&mut self, screen: ScreenState) {
        self.screen = screen;
        for button in &mut self.buttons {
            if button.status == ButtonStatus::Hidden {
                button.status = ButtonStatus::Default;
            }
        }
    }
}
