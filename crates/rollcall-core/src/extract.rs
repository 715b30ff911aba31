use crate::clipboard::Clipboard;
use crate::console::{log_empty_guidance, log_failure, Console};
use crate::domain::{PhoneSet, SelectorSet, MIN_PHONE_LENGTH};
use crate::page::Document;
use crate::panel::{self, PanelOutcome};
use crate::scan::{self, StageError, StageReport};
use crate::settle::{self, Clock, SettleMode, SettlePolicy, WaitOutcome};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub selectors: SelectorSet,
    pub settle: SettlePolicy,
    pub min_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            selectors: SelectorSet::default(),
            settle: SettlePolicy::default(),
            min_length: MIN_PHONE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlePhase {
    AfterActivation,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettleRecord {
    pub phase: SettlePhase,
    pub outcome: WaitOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClipboardStatus {
    NotAttempted,
    Copied { backend: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Found,
    Empty,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub backend: String,
    pub panel: PanelOutcome,
    pub settle: Vec<SettleRecord>,
    pub stages: Vec<StageReport>,
    pub numbers: Vec<String>,
    pub clipboard: ClipboardStatus,
    pub outcome: Outcome,
}

impl ExtractionReport {
    /// A pass that never reached the document.
    pub fn unreachable(backend: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            panel: PanelOutcome::NotAttempted,
            settle: Vec::new(),
            stages: Vec::new(),
            numbers: Vec::new(),
            clipboard: ClipboardStatus::NotAttempted,
            outcome: Outcome::Failed {
                error: error.into(),
            },
        }
    }
}

pub fn report_failure(
    console: &mut dyn Console,
    backend: impl Into<String>,
    message: &str,
) -> ExtractionReport {
    log_failure(console, message);
    ExtractionReport::unreachable(backend, message)
}

pub struct Extractor<'a> {
    document: &'a mut dyn Document,
    clipboard: &'a mut dyn Clipboard,
    console: &'a mut dyn Console,
    clock: &'a dyn Clock,
}

impl<'a> Extractor<'a> {
    pub fn new(
        document: &'a mut dyn Document,
        clipboard: &'a mut dyn Clipboard,
        console: &'a mut dyn Console,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            document,
            clipboard,
            console,
            clock,
        }
    }

    pub fn run(&mut self, options: &ExtractOptions) -> ExtractionReport {
        let backend = self.document.backend_name().to_string();
        debug!(backend = %backend, "starting extraction");

        let panel = panel::open_panel(&mut *self.document, &options.selectors.panel);
        let settle = self.settle(panel.activated(), options);

        let mut found = PhoneSet::new();
        let results = [
            scan::scan_targeted(&mut *self.document, &options.selectors.targeted, &mut found),
            scan::scan_full_text(&mut *self.document, &mut found),
            scan::scan_copyable(&mut *self.document, &options.selectors.copyable, &mut found),
        ];

        let mut stages = Vec::with_capacity(results.len());
        let mut errors: Vec<StageError> = Vec::new();
        for result in results {
            match result {
                Ok(report) => stages.push(report),
                Err(err) => {
                    stages.push(StageReport::failed(&err));
                    errors.push(err);
                }
            }
        }

        if errors.len() == stages.len() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            log_failure(&mut *self.console, &message);
            return ExtractionReport {
                backend,
                panel,
                settle,
                stages,
                numbers: Vec::new(),
                clipboard: ClipboardStatus::NotAttempted,
                outcome: Outcome::Failed { error: message },
            };
        }

        for err in &errors {
            warn!(error = %err, "continuing without failed stage");
            self.console.error(&format!("Skipped a scan: {err}"));
        }

        debug!(unique = found.len(), "scans merged");
        let numbers = found.into_filtered(options.min_length);
        if numbers.is_empty() {
            log_empty_guidance(&mut *self.console);
            return ExtractionReport {
                backend,
                panel,
                settle,
                stages,
                numbers,
                clipboard: ClipboardStatus::NotAttempted,
                outcome: Outcome::Empty,
            };
        }

        let clipboard = self.publish(&numbers);
        ExtractionReport {
            backend,
            panel,
            settle,
            stages,
            numbers,
            clipboard,
            outcome: Outcome::Found,
        }
    }

    fn settle(&mut self, activated: bool, options: &ExtractOptions) -> Vec<SettleRecord> {
        if self.document.is_static() {
            debug!("static document, skipping settle");
            return Vec::new();
        }

        let mut records = Vec::with_capacity(2);
        if activated {
            records.push(self.wait_phase(
                SettlePhase::AfterActivation,
                options.settle.after_activation,
                options,
            ));
        }
        records.push(self.wait_phase(SettlePhase::Render, options.settle.render, options));
        records
    }

    fn wait_phase(
        &mut self,
        phase: SettlePhase,
        timeout: Duration,
        options: &ExtractOptions,
    ) -> SettleRecord {
        let document = &mut *self.document;
        let ready_selectors = &options.selectors.ready;
        let mode = options.settle.mode;
        let outcome = settle::wait_until(self.clock, timeout, options.settle.poll_interval, || {
            mode == SettleMode::Poll && is_ready(&mut *document, ready_selectors)
        });
        debug!(?phase, ?outcome, "settle phase finished");
        SettleRecord { phase, outcome }
    }

    fn publish(&mut self, numbers: &[String]) -> ClipboardStatus {
        self.console.log("Found phone numbers:");
        for (index, number) in numbers.iter().enumerate() {
            self.console.log(&format!("{}. {}", index + 1, number));
        }

        let payload = numbers.join("\n");
        match self.clipboard.write_text(&payload) {
            Ok(()) => {
                self.console.log("Phone numbers copied to clipboard.");
                self.console.acknowledge(&format!(
                    "Found {} phone numbers and copied to clipboard!",
                    numbers.len()
                ));
                ClipboardStatus::Copied {
                    backend: self.clipboard.backend_name().to_string(),
                }
            }
            Err(err) => {
                debug!(error = %err, "clipboard write failed");
                self.console.error("Could not copy to clipboard automatically.");
                self.console.log("Copy this text manually:");
                self.console.log(&payload);
                ClipboardStatus::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}

fn is_ready(document: &mut dyn Document, selectors: &[String]) -> bool {
    selectors.iter().any(|selector| {
        document.exists(selector).unwrap_or(false)
    })
}
