use super::{SelectorFailures, Stage, StageError, StageReport};
use crate::domain::{first_loose_match, PhoneSet};
use crate::page::Document;

/// Scans copyable-text elements, taking only the first loose match of each.
///
/// Loose matches are digits only, so they are inserted as-is.
pub fn scan_copyable<D>(
    document: &mut D,
    selectors: &[String],
    found: &mut PhoneSet,
) -> Result<StageReport, StageError>
where
    D: Document + ?Sized,
{
    let mut report = StageReport::new(Stage::Copyable);
    let mut failures = SelectorFailures::new(Stage::Copyable);

    for selector in selectors {
        failures.attempt();
        let elements = match document.query_all(selector) {
            Ok(elements) => elements,
            Err(err) => {
                failures.record(&mut report, selector, err);
                continue;
            }
        };

        for element in &elements {
            report.elements += 1;
            let text = element.text_or_title();
            if !text.contains('+') {
                continue;
            }
            if let Some(candidate) = first_loose_match(text) {
                report.matches += 1;
                if found.insert(candidate.to_string()) {
                    report.inserted += 1;
                }
            }
        }
    }

    failures.finish(report)
}
