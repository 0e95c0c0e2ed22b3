//! Navigation components for the file browser
//!
//! Split into modules to reduce complexity.

mod browser;
mod clipboard;
mod history;
mod selection;

pub use browser::{Browser, BrowserEvent};
pub use clipboard::{Clipboard, ClipboardMode, PasteReport};
pub use history::History;
pub use selection::Selection;
