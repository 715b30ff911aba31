pub mod clipboard;
pub mod snapshot;
pub mod webdriver;

pub use clipboard::{CommandClipboard, SystemClipboard};
pub use snapshot::{check_selector, SnapshotDocument};
pub use webdriver::WebDriverOptions;
