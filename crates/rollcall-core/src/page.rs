use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementHandle(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub handle: ElementHandle,
    pub text: String,
    pub title: Option<String>,
}

impl Element {
    pub fn text_or_title(&self) -> &str {
        if !self.text.is_empty() {
            return &self.text;
        }
        self.title.as_deref().unwrap_or("")
    }
}

pub trait Document {
    fn backend_name(&self) -> &str;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>>;

    fn visible_text(&mut self) -> Result<String>;

    fn activate(&mut self, element: &Element) -> Result<()>;

    fn is_static(&self) -> bool {
        false
    }

    fn query_first(&mut self, selector: &str) -> Result<Option<Element>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn exists(&mut self, selector: &str) -> Result<bool> {
        Ok(self.query_first(selector)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementHandle};

    fn element(text: &str, title: Option<&str>) -> Element {
        Element {
            handle: ElementHandle(0),
            text: text.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn text_wins_over_title() {
        assert_eq!(element("+1 555", Some("+44")).text_or_title(), "+1 555");
    }

    #[test]
    fn empty_text_falls_back_to_title() {
        assert_eq!(element("", Some("+44 20")).text_or_title(), "+44 20");
        assert_eq!(element("", None).text_or_title(), "");
    }
}
