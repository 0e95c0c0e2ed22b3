//! File manager core
//!
//! Trash store, path clipboard, navigation history and the browser
//! controller that ties them together for a presentation layer.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod interact;
pub mod navigation;
pub mod operations;
pub mod trash;

pub use error::{ErrorKind, FsError, Severity};
pub use interact::{Opener, Prompt};
pub use navigation::{Browser, BrowserEvent, ClipboardMode, PasteReport};
pub use operations::TrashReport;
pub use trash::{TrashItem, TrashStore};
