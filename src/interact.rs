//! Synchronous capabilities the core borrows from the front-end

use std::io;
use std::path::Path;

/// Yes/no and text questions answered by the user
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;

    /// Single line input, `None` when the user cancels
    fn input(&mut self, message: &str, initial: &str) -> Option<String>;
}

/// Opens a file with its default handler
pub trait Opener {
    fn open(&self, path: &Path) -> io::Result<()>;
}
