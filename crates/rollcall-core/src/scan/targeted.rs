use super::{SelectorFailures, Stage, StageError, StageReport};
use crate::domain::{find_phone_matches, normalize_phone, PhoneSet};
use crate::page::Document;
use tracing::debug;

pub fn scan_targeted<D>(
    document: &mut D,
    selectors: &[String],
    found: &mut PhoneSet,
) -> Result<StageReport, StageError>
where
    D: Document + ?Sized,
{
    let mut report = StageReport::new(Stage::Targeted);
    let mut failures = SelectorFailures::new(Stage::Targeted);

    for selector in selectors {
        failures.attempt();
        let elements = match document.query_all(selector) {
            Ok(elements) => elements,
            Err(err) => {
                failures.record(&mut report, selector, err);
                continue;
            }
        };
        debug!(selector = %selector, count = elements.len(), "targeted selector matched");

        for element in &elements {
            report.elements += 1;
            for candidate in find_phone_matches(element.text_or_title()) {
                report.matches += 1;
                if found.insert(normalize_phone(candidate)) {
                    report.inserted += 1;
                }
            }
        }
    }

    failures.finish(report)
}
