use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const MIN_PHONE_LENGTH: usize = 10;

// Country code, then up to three more digit groups joined by an optional
// single space or hyphen. Digits are ASCII only.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+[0-9]{1,4}[\s\-]?[0-9]{1,4}[\s\-]?[0-9]{1,4}[\s\-]?[0-9]{1,9}")
        .expect("phone pattern is valid")
});

static LOOSE_PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+[0-9]+").expect("loose phone pattern is valid"));

pub fn find_phone_matches(text: &str) -> impl Iterator<Item = &str> + '_ {
    PHONE_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// The first `+` followed by a digit run, without any group structure.
pub fn first_loose_match(text: &str) -> Option<&str> {
    LOOSE_PHONE_PATTERN.find(text).map(|m| m.as_str())
}

pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect()
}

pub fn is_plausible_phone(value: &str, min_length: usize) -> bool {
    value.starts_with('+') && value.chars().count() >= min_length
}

#[derive(Debug, Clone, Default)]
pub struct PhoneSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl PhoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: String) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.order.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_filtered(self, min_length: usize) -> Vec<String> {
        self.order
            .into_iter()
            .filter(|value| is_plausible_phone(value, min_length))
            .collect()
    }
}
