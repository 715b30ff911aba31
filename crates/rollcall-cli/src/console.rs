use anyhow::Result;
use rollcall_config::AcknowledgeBackend;
use rollcall_core::Console;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::warn;

pub trait Acknowledger {
    fn acknowledge(&self, message: &str) -> Result<()>;
}

/// Prints the message and, on a terminal, waits for Enter.
pub struct PromptAcknowledger {
    json: bool,
}

impl Acknowledger for PromptAcknowledger {
    fn acknowledge(&self, message: &str) -> Result<()> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            emit(self.json, message);
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        write!(stderr, "{message} [press Enter] ")?;
        stderr.flush()?;
        let mut buffer = String::new();
        stdin.lock().read_line(&mut buffer)?;
        Ok(())
    }
}

pub struct StdoutAcknowledger {
    json: bool,
}

impl Acknowledger for StdoutAcknowledger {
    fn acknowledge(&self, message: &str) -> Result<()> {
        emit(self.json, message);
        Ok(())
    }
}

#[cfg(feature = "desktop-notify")]
pub struct DesktopAcknowledger;

#[cfg(feature = "desktop-notify")]
impl Acknowledger for DesktopAcknowledger {
    fn acknowledge(&self, message: &str) -> Result<()> {
        notify_rust::Notification::new()
            .summary("rollcall")
            .body(message)
            .show()?;
        Ok(())
    }
}

pub struct SilentAcknowledger;

impl Acknowledger for SilentAcknowledger {
    fn acknowledge(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

pub fn acknowledger_for(
    backend: AcknowledgeBackend,
    json: bool,
    no_confirm: bool,
) -> Box<dyn Acknowledger> {
    if no_confirm {
        return Box::new(SilentAcknowledger);
    }
    match backend {
        AcknowledgeBackend::Prompt => Box::new(PromptAcknowledger { json }),
        AcknowledgeBackend::Stdout => Box::new(StdoutAcknowledger { json }),
        #[cfg(feature = "desktop-notify")]
        AcknowledgeBackend::Desktop => Box::new(DesktopAcknowledger),
        #[cfg(not(feature = "desktop-notify"))]
        AcknowledgeBackend::Desktop => {
            warn!("desktop notifications unavailable (build with desktop-notify feature)");
            Box::new(StdoutAcknowledger { json })
        }
        AcknowledgeBackend::Off => Box::new(SilentAcknowledger),
    }
}

/// The operator log on the terminal. With `--json`, stdout carries only the
/// report, so log lines move to stderr.
pub struct TerminalConsole {
    json: bool,
    acknowledger: Box<dyn Acknowledger>,
}

impl TerminalConsole {
    pub fn new(json: bool, acknowledger: Box<dyn Acknowledger>) -> Self {
        Self { json, acknowledger }
    }
}

impl Console for TerminalConsole {
    fn log(&mut self, line: &str) {
        emit(self.json, line);
    }

    fn error(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn acknowledge(&mut self, message: &str) {
        if let Err(err) = self.acknowledger.acknowledge(message) {
            warn!(error = %err, "acknowledgment failed, falling back to the log");
            emit(self.json, message);
        }
    }
}

fn emit(json: bool, line: &str) {
    if json {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}
