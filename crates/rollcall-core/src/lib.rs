pub mod clipboard;
pub mod console;
pub mod domain;
pub mod error;
pub mod extract;
pub mod page;
pub mod panel;
pub mod scan;
pub mod settle;

pub use clipboard::{Clipboard, ClipboardError, DisabledClipboard};
pub use console::Console;
pub use domain::*;
pub use error::PageError;
pub use extract::{ExtractOptions, ExtractionReport, Extractor, Outcome};
pub use page::{Document, Element, ElementHandle};
pub use settle::{Clock, SettleMode, SettlePolicy, SystemClock};
