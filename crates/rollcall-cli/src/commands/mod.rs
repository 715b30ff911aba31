use anyhow::{Context as _, Result};
use rollcall_config::AppConfig;
use rollcall_core::{Clipboard, DisabledClipboard};
use rollcall_page::{CommandClipboard, SystemClipboard};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

use crate::error::invalid_input;

pub mod completions;
pub mod extract;
pub mod scan;
pub mod selectors;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn clipboard(&self, disabled: bool) -> Box<dyn Clipboard> {
        if disabled || !self.config.clipboard.enabled {
            debug!("clipboard disabled");
            return Box::new(DisabledClipboard);
        }
        match self
            .config
            .clipboard
            .command
            .as_deref()
            .and_then(CommandClipboard::from_argv)
        {
            Some(command) => Box::new(command),
            None => Box::new(SystemClipboard::detect()),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "read stdin")?;
            if buffer.trim().is_empty() {
                return Err(invalid_input("input is empty (provide a file or stdin)"));
            }
            Ok(buffer)
        }
    }
}
