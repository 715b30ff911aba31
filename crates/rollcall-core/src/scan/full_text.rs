use super::{Stage, StageError, StageReport};
use crate::domain::{find_phone_matches, normalize_phone, PhoneSet};
use crate::page::Document;

pub fn scan_full_text<D>(document: &mut D, found: &mut PhoneSet) -> Result<StageReport, StageError>
where
    D: Document + ?Sized,
{
    let text = document
        .visible_text()
        .map_err(|err| StageError::new(Stage::FullText, err))?;
    Ok(scan_text(&text, found))
}

pub fn scan_text(text: &str, found: &mut PhoneSet) -> StageReport {
    let mut report = StageReport::new(Stage::FullText);
    for candidate in find_phone_matches(text) {
        report.matches += 1;
        if found.insert(normalize_phone(candidate)) {
            report.inserted += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::scan_text;
    use crate::domain::PhoneSet;

    #[test]
    fn scan_text_normalizes_and_counts() {
        let mut found = PhoneSet::new();
        let report = scan_text(
            "Contact: +1 555-123-4567 and +44 20 7946 0958, again +15551234567",
            &mut found,
        );
        assert_eq!(report.matches, 3);
        assert_eq!(report.inserted, 2);
        let values: Vec<&str> = found.iter().collect();
        assert_eq!(values, vec!["+15551234567", "+442079460958"]);
    }
}
