use anyhow::{Context as _, Result};
use rollcall_core::extract::report_failure;
use rollcall_core::{Document, Extractor, Outcome, SelectorSet, SystemClock};
use rollcall_page::{check_selector, webdriver, SnapshotDocument, WebDriverOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::commands::{print_json, read_input, Context};
use crate::console::{acknowledger_for, TerminalConsole};
use crate::error::{extraction_failed, invalid_input};

#[derive(Debug, clap::Args)]
pub struct ExtractArgs {
    /// Saved HTML page; omit or pass `-` to read stdin
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Drive a live browser through this WebDriver server instead of a saved page.
    /// Without a value, `webdriver.url` from the config is used.
    #[arg(
        long,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with = "input"
    )]
    pub webdriver: Option<String>,
    /// Page to open once the session is up
    #[arg(long, value_name = "URL", requires = "webdriver")]
    pub url: Option<String>,
    /// Wait until this selector matches before extracting
    #[arg(long, value_name = "SELECTOR", requires = "webdriver")]
    pub wait_for: Option<String>,
    #[arg(long, value_name = "SECS", requires = "webdriver")]
    pub login_timeout: Option<u64>,
    /// Print the numbers instead of copying them
    #[arg(long)]
    pub no_clipboard: bool,
    /// Skip the final acknowledgment
    #[arg(long)]
    pub no_confirm: bool,
}

pub fn extract(ctx: &Context<'_>, args: ExtractArgs) -> Result<()> {
    check_selectors(&ctx.config.selectors)?;

    let options = ctx.config.extract_options();
    let acknowledger = acknowledger_for(ctx.config.acknowledge, ctx.json, args.no_confirm);
    let mut console = TerminalConsole::new(ctx.json, acknowledger);
    let mut clipboard = ctx.clipboard(args.no_clipboard);
    let clock = SystemClock;

    let backend = if args.webdriver.is_some() {
        "webdriver"
    } else {
        "snapshot"
    };
    let mut document = match open_document(ctx, &args) {
        Ok(document) => document,
        Err(err) => {
            let report = report_failure(&mut console, backend, &format!("{err:#}"));
            if ctx.json {
                print_json(&report)?;
            }
            return Err(err);
        }
    };

    let report = Extractor::new(
        document.as_mut(),
        clipboard.as_mut(),
        &mut console,
        &clock,
    )
    .run(&options);
    info!(numbers = report.numbers.len(), "extraction finished");

    if ctx.json {
        print_json(&report)?;
    }

    match report.outcome {
        Outcome::Failed { error } => Err(extraction_failed(error)),
        Outcome::Found | Outcome::Empty => Ok(()),
    }
}

fn check_selectors(selectors: &SelectorSet) -> Result<()> {
    let strategies = selectors.panel.iter().map(|strategy| &strategy.selector);
    let lists = selectors
        .targeted
        .iter()
        .chain(&selectors.ready)
        .chain(&selectors.copyable);
    for selector in strategies.chain(lists) {
        check_selector(selector).with_context(|| "check configured selectors")?;
    }
    Ok(())
}

fn open_document(ctx: &Context<'_>, args: &ExtractArgs) -> Result<Box<dyn Document>> {
    let Some(endpoint) = args.webdriver.as_deref() else {
        let markup = read_input(args.input.as_deref())?;
        let label = match args.input.as_deref() {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "stdin".to_string(),
        };
        debug!(source = %label, bytes = markup.len(), "loading snapshot");
        return Ok(Box::new(SnapshotDocument::with_label(label, &markup)));
    };

    let settings = &ctx.config.webdriver;
    let endpoint = if endpoint.is_empty() {
        settings.url.clone().ok_or_else(|| {
            invalid_input("--webdriver needs a URL (or set webdriver.url in the config)")
        })?
    } else {
        endpoint.to_string()
    };

    let mut options = WebDriverOptions::new(endpoint);
    options.page_url = args.url.clone().or_else(|| settings.page_url.clone());
    options.wait_for = args.wait_for.clone().or_else(|| settings.wait_for.clone());
    if let Some(selector) = &options.wait_for {
        check_selector(selector).with_context(|| "check --wait-for selector")?;
    }
    let timeout = args.login_timeout.unwrap_or(settings.login_timeout_secs);
    if timeout == 0 {
        return Err(invalid_input("--login-timeout must be at least 1 second"));
    }
    options.login_timeout = Duration::from_secs(timeout);
    options.poll_interval = ctx.config.settle.poll_interval;

    let document = webdriver::connect(&options).with_context(|| "open webdriver session")?;
    Ok(document)
}
