use crate::domain::LookupStrategy;
use crate::page::{Document, Element};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelOutcome {
    Activated { strategy: String },
    ActivationFailed { strategy: String, error: String },
    NotFound,
    NotAttempted,
}

impl PanelOutcome {
    pub fn activated(&self) -> bool {
        matches!(self, PanelOutcome::Activated { .. })
    }
}

/// Tries each strategy in rank order and returns the first match of the
/// first strategy that yields one. Failing queries count as no match.
pub fn find_panel_control<'s, D>(
    document: &mut D,
    strategies: &'s [LookupStrategy],
) -> Option<(&'s LookupStrategy, Element)>
where
    D: Document + ?Sized,
{
    for strategy in strategies {
        match document.query_first(&strategy.selector) {
            Ok(Some(element)) => return Some((strategy, element)),
            Ok(None) => {
                debug!(strategy = %strategy.name, "panel strategy found nothing");
            }
            Err(err) => {
                debug!(strategy = %strategy.name, error = %err, "panel strategy query failed");
            }
        }
    }
    None
}

pub fn open_panel<D>(document: &mut D, strategies: &[LookupStrategy]) -> PanelOutcome
where
    D: Document + ?Sized,
{
    let Some((strategy, element)) = find_panel_control(document, strategies) else {
        debug!("no panel control found");
        return PanelOutcome::NotFound;
    };

    match document.activate(&element) {
        Ok(()) => {
            debug!(strategy = %strategy.name, "panel control activated");
            PanelOutcome::Activated {
                strategy: strategy.name.clone(),
            }
        }
        Err(err) => {
            warn!(strategy = %strategy.name, error = %err, "panel control activation failed");
            PanelOutcome::ActivationFailed {
                strategy: strategy.name.clone(),
                error: err.to_string(),
            }
        }
    }
}
