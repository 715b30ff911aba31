use serde::{Deserialize, Serialize};

pub const PANEL_STRATEGIES: [(&str, &str); 3] = [
    ("numbered-tab", r#"[data-tab="6"]"#),
    ("group-info-label", r#"[aria-label*="Group info"]"#),
    ("header-last-button", r#"header [role="button"]:last-child"#),
];

pub const TARGETED_SELECTORS: [&str; 5] = [
    r#"[data-testid="participant-item"]"#,
    r#"[data-testid="contact-info-drawer"] [role="listitem"]"#,
    r#".copyable-text[data-testid*="phone"]"#,
    r#"[title*="+"]"#,
    r#"span[title*="+"]"#,
];

/// Participant rows only exist once the group panel has rendered.
pub const READY_SELECTORS: [&str; 2] = [
    r#"[data-testid="participant-item"]"#,
    r#"[data-testid="contact-info-drawer"] [role="listitem"]"#,
];

pub const COPYABLE_SELECTORS: [&str; 1] = [r#".copyable-text, [data-testid*="copyable"]"#];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupStrategy {
    pub name: String,
    pub selector: String,
}

impl LookupStrategy {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorSet {
    /// Ranked; the first strategy with a match wins.
    pub panel: Vec<LookupStrategy>,
    pub targeted: Vec<String>,
    pub ready: Vec<String>,
    pub copyable: Vec<String>,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            panel: PANEL_STRATEGIES
                .iter()
                .map(|(name, selector)| LookupStrategy::new(*name, *selector))
                .collect(),
            targeted: to_owned(&TARGETED_SELECTORS),
            ready: to_owned(&READY_SELECTORS),
            copyable: to_owned(&COPYABLE_SELECTORS),
        }
    }
}

fn to_owned(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}
