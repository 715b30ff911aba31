use anyhow::Error;
use rollcall_config::ConfigError;
use rollcall_core::PageError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn extraction_failed(message: impl Into<String>) -> Error {
    CliError::ExtractionFailed(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::ExtractionFailed(_) => EXIT_FAILURE,
            };
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(page_err) = cause.downcast_ref::<PageError>() {
            return page_exit_code(page_err);
        }
    }
    EXIT_FAILURE
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidMinLength(_)
        | ConfigError::InvalidPollInterval(_)
        | ConfigError::EmptySelector { .. }
        | ConfigError::EmptyStrategyName
        | ConfigError::DuplicateStrategyName(_)
        | ConfigError::EmptyClipboardCommand
        | ConfigError::InvalidWebDriverField { .. }
        | ConfigError::InvalidLoginTimeout(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn page_exit_code(err: &PageError) -> u8 {
    match err {
        PageError::InvalidSelector { .. } => EXIT_INVALID_INPUT,
        PageError::Unavailable(_) | PageError::StaleHandle(_) | PageError::Backend(_) => {
            EXIT_FAILURE
        }
    }
}
