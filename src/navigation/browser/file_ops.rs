//! Clipboard, trash, rename and create operations on the browser

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::FsError;
use crate::interact::Prompt;
use crate::navigation::PasteReport;
use crate::operations::{self, TrashReport};
use crate::trash::TrashItem;

use super::{Browser, BrowserEvent};

impl Browser {
    /// Put the selection on the clipboard for copying, returns the count
    pub fn copy_selected(&mut self) -> usize {
        self.clipboard.copy(self.selection.to_paths());
        self.selection.len()
    }

    /// Put the selection on the clipboard for moving, returns the count
    pub fn cut_selected(&mut self) -> usize {
        self.clipboard.cut(self.selection.to_paths());
        self.selection.len()
    }

    /// Paste the clipboard into the current location
    pub fn paste(&mut self, prompt: &mut dyn Prompt) -> Result<PasteReport, FsError> {
        if self.clipboard.is_empty() {
            return Ok(PasteReport::default());
        }

        let dest_dir = self.path.clone();
        let result = self.clipboard.paste_to(&dest_dir, prompt);
        self.refresh_after_change();
        result
    }

    /// Ask for confirmation, then move the selection to the trash
    pub fn delete_selected(&mut self, prompt: &mut dyn Prompt) -> Result<TrashReport, FsError> {
        if self.selection.is_empty() {
            return Ok(TrashReport::default());
        }

        let paths = self.selection.to_paths();
        let confirmed = prompt.confirm(&format!("Move {} item(s) to trash?", paths.len()));
        let report = operations::delete(&self.trash, &paths, confirmed)?;
        self.refresh_after_change();
        Ok(report)
    }

    /// Ask for a new name for the first selected entry and rename it
    pub fn rename_selected(&mut self, prompt: &mut dyn Prompt) -> Result<PathBuf, FsError> {
        let Some(old_path) = self.selection.first().map(Path::to_path_buf) else {
            return Err(FsError::Cancelled);
        };
        let old_name = old_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let new_name = prompt
            .input(&format!("New name for '{}':", old_name), &old_name)
            .ok_or(FsError::Cancelled)?;
        self.rename(&old_path, new_name.trim())
    }

    pub fn rename(&mut self, old_path: &Path, new_name: &str) -> Result<PathBuf, FsError> {
        let old_path = self.path.join(old_path);
        let new_path = operations::rename(&old_path, new_name)?;
        if new_path != old_path && self.selection.contains(&old_path) {
            self.selection.remove(&old_path);
            self.selection.add(new_path.clone());
            self.emit(BrowserEvent::SelectionChanged(self.selection.to_paths()));
        }
        self.refresh_after_change();
        Ok(new_path)
    }

    pub fn create_folder(&mut self, name: &str) -> Result<PathBuf, FsError> {
        let path = operations::create_folder(&self.path, name)?;
        self.refresh_after_change();
        Ok(path)
    }

    pub fn create_file(&mut self, name: &str) -> Result<PathBuf, FsError> {
        let path = operations::create_file(&self.path, name)?;
        self.refresh_after_change();
        Ok(path)
    }

    /// Ask for a folder name and create it
    pub fn new_folder(&mut self, prompt: &mut dyn Prompt) -> Result<PathBuf, FsError> {
        let name = prompt.input("Folder name:", "").ok_or(FsError::Cancelled)?;
        self.create_folder(name.trim())
    }

    /// Ask for a file name and create it
    pub fn new_file(&mut self, prompt: &mut dyn Prompt) -> Result<PathBuf, FsError> {
        let name = prompt.input("File name:", "").ok_or(FsError::Cancelled)?;
        self.create_file(name.trim())
    }

    /// Permanently delete the trash content after confirmation
    ///
    /// Returns the number of items that were in the trash.
    pub fn empty_trash(&mut self, prompt: &mut dyn Prompt) -> Result<usize, FsError> {
        let size = self.trash.get_trash_size();
        if size == 0 {
            return Err(FsError::Cancelled);
        }

        let message = format!("Permanently delete {} item(s) from trash?", size);
        if !prompt.confirm(&message) {
            return Err(FsError::Cancelled);
        }

        let result = self.trash.empty_trash();
        self.refresh_after_change();
        result.map(|()| size)
    }

    pub fn trash_items(&self) -> Vec<TrashItem> {
        self.trash.items()
    }

    pub fn restore_from_trash(&mut self, name: &str) -> Result<PathBuf, FsError> {
        let restored = self.trash.restore(name)?;
        self.refresh_after_change();
        Ok(restored)
    }

    /// Permanently delete one trashed item after confirmation
    pub fn purge_from_trash(&mut self, name: &str, prompt: &mut dyn Prompt) -> Result<(), FsError> {
        if self.trash.find(name).is_none() {
            return Err(FsError::NotFound(self.trash.files_dir().join(name)));
        }
        if !prompt.confirm(&format!("Permanently delete '{}'?", name)) {
            return Err(FsError::Cancelled);
        }

        let result = self.trash.purge(name);
        self.refresh_after_change();
        result
    }

    fn refresh_after_change(&mut self) {
        if let Err(err) = self.refresh() {
            warn!("refresh after change failed: {}", err);
        }
    }
}
