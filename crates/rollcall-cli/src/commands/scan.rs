use anyhow::Result;
use rollcall_core::extract::ClipboardStatus;
use rollcall_core::scan::{scan_text, StageReport};
use rollcall_core::PhoneSet;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::commands::{print_json, read_input, Context};

#[derive(Debug, clap::Args)]
pub struct ScanArgs {
    /// Text file to scan; omit or pass `-` to read stdin
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Also copy the numbers to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Debug, Serialize)]
struct ScanOutput {
    numbers: Vec<String>,
    stage: StageReport,
    clipboard: ClipboardStatus,
}

pub fn scan(ctx: &Context<'_>, args: ScanArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;

    let mut found = PhoneSet::new();
    let stage = scan_text(&text, &mut found);
    let numbers = found.into_filtered(ctx.config.min_length);
    debug!(matches = stage.matches, kept = numbers.len(), "text scanned");

    let clipboard = if args.copy && !numbers.is_empty() {
        let mut clipboard = ctx.clipboard(false);
        match clipboard.write_text(&numbers.join("\n")) {
            Ok(()) => ClipboardStatus::Copied {
                backend: clipboard.backend_name().to_string(),
            },
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                eprintln!("Could not copy to clipboard automatically.");
                ClipboardStatus::Failed {
                    error: err.to_string(),
                }
            }
        }
    } else {
        ClipboardStatus::NotAttempted
    };

    if ctx.json {
        return print_json(&ScanOutput {
            numbers,
            stage,
            clipboard,
        });
    }

    for number in &numbers {
        println!("{number}");
    }
    Ok(())
}
