pub trait Console {
    fn log(&mut self, line: &str);
    fn error(&mut self, line: &str);
    /// Blocks until the operator has seen `message`, where the backend supports it.
    fn acknowledge(&mut self, message: &str);
}

pub const EMPTY_GUIDANCE: [&str; 3] = [
    "1. Open group info first",
    "2. Scroll through the participants list",
    "3. Run the extraction again",
];

pub const FAILURE_GUIDANCE: [&str; 4] = [
    "1. Make sure a group chat is open in the messaging web page",
    "2. Open the group info panel",
    "3. Scroll through participants if there are many",
    "4. Run the extraction again",
];

pub fn log_empty_guidance(console: &mut dyn Console) {
    console.log("No phone numbers found. Make sure a group chat is open and try:");
    for step in EMPTY_GUIDANCE {
        console.log(step);
    }
}

pub fn log_failure(console: &mut dyn Console, message: &str) {
    console.error(&format!("Error extracting phone numbers: {message}"));
    console.log("Try these steps:");
    for step in FAILURE_GUIDANCE {
        console.log(step);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Log(String),
    Error(String),
    Acknowledge(String),
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    pub lines: Vec<ConsoleLine>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                ConsoleLine::Log(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                ConsoleLine::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn acknowledgments(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                ConsoleLine::Acknowledge(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Console for MemoryConsole {
    fn log(&mut self, line: &str) {
        self.lines.push(ConsoleLine::Log(line.to_string()));
    }

    fn error(&mut self, line: &str) {
        self.lines.push(ConsoleLine::Error(line.to_string()));
    }

    fn acknowledge(&mut self, message: &str) {
        self.lines.push(ConsoleLine::Acknowledge(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_guidance_lists_four_steps() {
        let mut console = MemoryConsole::new();
        log_failure(&mut console, "boom");
        assert_eq!(console.errors(), vec!["Error extracting phone numbers: boom"]);
        assert_eq!(console.logged().len(), 5);
        assert!(console.logged()[4].starts_with("4. "));
    }

    #[test]
    fn empty_guidance_lists_three_steps() {
        let mut console = MemoryConsole::new();
        log_empty_guidance(&mut console);
        assert_eq!(console.logged().len(), 4);
        assert!(console.errors().is_empty());
    }
}
