pub mod copyable;
pub mod full_text;
pub mod targeted;

use crate::error::PageError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use copyable::scan_copyable;
pub use full_text::{scan_full_text, scan_text};
pub use targeted::scan_targeted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Targeted,
    FullText,
    Copyable,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Targeted => write!(f, "targeted"),
            Stage::FullText => write!(f, "full-text"),
            Stage::Copyable => write!(f, "copyable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub elements: usize,
    pub matches: usize,
    pub inserted: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            elements: 0,
            matches: 0,
            inserted: 0,
            warnings: Vec::new(),
            error: None,
        }
    }

    pub fn failed(err: &StageError) -> Self {
        let mut report = Self::new(err.stage);
        report.error = Some(err.source.to_string());
        report
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} scan failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: PageError,
}

impl StageError {
    pub fn new(stage: Stage, source: PageError) -> Self {
        Self { stage, source }
    }
}

pub(crate) struct SelectorFailures {
    stage: Stage,
    attempted: usize,
    last: Option<PageError>,
    failed: usize,
}

impl SelectorFailures {
    pub(crate) fn new(stage: Stage) -> Self {
        Self {
            stage,
            attempted: 0,
            last: None,
            failed: 0,
        }
    }

    pub(crate) fn attempt(&mut self) {
        self.attempted += 1;
    }

    pub(crate) fn record(&mut self, report: &mut StageReport, selector: &str, err: PageError) {
        tracing::warn!(stage = %self.stage, selector, error = %err, "selector query failed");
        report.warnings.push(format!("{selector}: {err}"));
        self.failed += 1;
        self.last = Some(err);
    }

    /// The stage fails only when every selector it tried failed.
    pub(crate) fn finish(self, report: StageReport) -> Result<StageReport, StageError> {
        match self.last {
            Some(source) if self.failed == self.attempted => {
                Err(StageError::new(self.stage, source))
            }
            _ => Ok(report),
        }
    }
}
