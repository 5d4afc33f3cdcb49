//! Terminal front end for the test screen
//!
//! Reads one command per line (`1`, `2`, `3` or a button label, `q` to quit),
//! follows orchestrator progress through a [`ProgressView`] and redraws the
//! screen whenever the state machine changes. Probe execution runs on the
//! orchestrator's task, so input stays responsive during a run.

use super::state::{
    ButtonKind, ButtonStatus, ScreenState, ScreenStateMachine, UiCommand, UserAction,
};
use crate::{
    error::Result,
    orchestrator::{DiagnosticOrchestrator, ProgressSnapshot, RunStart},
    types::RunSequence,
};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Frame length; button cooldowns count these
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

pub struct TerminalScreen<'a> {
    orchestrator: &'a DiagnosticOrchestrator,
    machine: ScreenStateMachine,
    use_colors: bool,
}

impl<'a> TerminalScreen<'a> {
    pub fn new(orchestrator: &'a DiagnosticOrchestrator, use_colors: bool) -> Self {
        Self {
            orchestrator,
            machine: ScreenStateMachine::new(),
            use_colors,
        }
    }

    pub fn machine(&self) -> &ScreenStateMachine {
        &self.machine
    }

    /// Run the screen until the user quits, or input ends with no run in progress
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut progress = self.orchestrator.progress();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        let mut input_closed = false;

        self.render(out, &progress.snapshot())?;

        loop {
            if input_closed && !self.orchestrator.is_running() {
                self.sync(out, &progress.snapshot())?;
                break;
            }

            tokio::select! {
                line = lines.next_line(), if !input_closed => match line? {
                    Some(line) => {
                        if is_quit(&line) {
                            break;
                        }
                        self.on_input(out, &line, &progress.snapshot())?;
                    }
                    None => input_closed = true,
                },
                snapshot = progress.changed() => {
                    let before = self.machine.screen();
                    self.machine.observe(&snapshot);
                    if self.machine.screen() != before || snapshot.is_running() {
                        self.render(out, &snapshot)?;
                    }
                }
                _ = ticker.tick() => {
                    self.machine.handle(UserAction::Tick);
                }
            }
        }

        Ok(())
    }

    fn on_input<W: Write>(
        &mut self,
        out: &mut W,
        line: &str,
        snapshot: &ProgressSnapshot,
    ) -> Result<()> {
        let Some(kind) = parse_button(line) else {
            if !line.trim().is_empty() {
                writeln!(out, "Unknown choice '{}'", line.trim())?;
            }
            return Ok(());
        };

        self.machine.handle(UserAction::Highlight(kind));
        match self.machine.handle(UserAction::Press(kind)) {
            Some(UiCommand::Start(sequence)) => {
                self.start(sequence);
                self.render(out, &self.orchestrator.progress().snapshot())?;
            }
            None => {
                self.machine.handle(UserAction::ClearHighlight);
                if self.machine.screen() != ScreenState::Testing {
                    writeln!(out, "Please wait a moment before choosing again")?;
                } else {
                    self.render(out, snapshot)?;
                }
            }
        }
        Ok(())
    }

    fn start(&self, sequence: RunSequence) {
        let start = match sequence {
            RunSequence::Diagnostic(mode) => self.orchestrator.run(mode),
            RunSequence::Maintenance => self.orchestrator.run_maintenance(),
        };
        // The outcome arrives through the progress view
        if let RunStart::Started(handle) = start {
            drop(handle);
        }
    }

    fn sync<W: Write>(&mut self, out: &mut W, snapshot: &ProgressSnapshot) -> Result<()> {
        let before = self.machine.screen();
        self.machine.observe(snapshot);
        if self.machine.screen() != before {
            self.render(out, snapshot)?;
        }
        Ok(())
    }

    fn render<W: Write>(&self, out: &mut W, snapshot: &ProgressSnapshot) -> Result<()> {
        writeln!(out)?;
        let message = self.machine.message();
        if self.use_colors {
            let message = match self.machine.screen() {
                ScreenState::Failed => message.red().bold(),
                ScreenState::Complete => message.green().bold(),
                _ => message.bright_red(),
            };
            writeln!(out, "{}", message)?;
        } else {
            writeln!(out, "{}", message)?;
        }

        match self.machine.screen() {
            ScreenState::Testing => {
                for (kind, done) in snapshot.probe_flags() {
                    let marker = if done { "[x]" } else { "[ ]" };
                    if self.use_colors && done {
                        writeln!(out, "  {} {}", marker.green(), kind.label())?;
                    } else {
                        writeln!(out, "  {} {}", marker, kind.label())?;
                    }
                }
            }
            ScreenState::Complete => {
                if let Some(path) = self.machine.report_path() {
                    writeln!(out, "Results saved to {}", path.display())?;
                }
            }
            ScreenState::Failed => {
                if let Some(reason) = self.machine.failure() {
                    writeln!(out, "{}", reason)?;
                }
            }
            ScreenState::Welcome => {}
        }

        let visible: Vec<_> = self
            .machine
            .buttons()
            .iter()
            .filter(|button| button.status != ButtonStatus::Hidden)
            .collect();
        if !visible.is_empty() {
            writeln!(out)?;
            for button in visible {
                let label = format!("  {}) {}", button.kind.shortcut(), button.kind.label());
                if self.use_colors && button.status != ButtonStatus::Default {
                    writeln!(out, "{}", label.bold())?;
                } else {
                    writeln!(out, "{}", label)?;
                }
            }
            writeln!(out, "  q) Quit")?;
        }

        out.flush()?;
        Ok(())
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Map a typed line onto a button, by shortcut or label
fn parse_button(line: &str) -> Option<ButtonKind> {
    let line = line.trim();
    let mut chars = line.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        return ButtonKind::from_shortcut(key);
    }
    ButtonKind::ALL
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(line))
}
