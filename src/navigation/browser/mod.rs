//! File browser controller
//!
//! Owns the current location, navigation history, selection, clipboard and
//! trash store. Split into submodules for reduced complexity.

mod file_ops;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{FsError, IoResultExt};
use crate::filesystem::{self, Entry};
use crate::interact::Opener;
use crate::trash::TrashStore;

use super::{Clipboard, History, Selection};

/// Change notifications for the presentation layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserEvent {
    LocationChanged(PathBuf),
    SelectionChanged(Vec<PathBuf>),
}

/// File browser state
pub struct Browser {
    path: PathBuf,
    entries: Vec<Entry>,
    show_hidden: bool,
    history: History,
    selection: Selection,
    clipboard: Clipboard,
    trash: TrashStore,
    event_tx: mpsc::UnboundedSender<BrowserEvent>,
    event_rx: mpsc::UnboundedReceiver<BrowserEvent>,
}

impl Browser {
    pub fn new(start_path: Option<PathBuf>, trash: TrashStore, show_hidden: bool) -> Self {
        let path = match start_path.as_deref().map(resolve_directory) {
            Some(Ok(p)) => p,
            Some(Err(err)) => {
                warn!("cannot start in {:?}: {}, using cwd", start_path, err);
                Self::fallback_dir()
            }
            None => Self::fallback_dir(),
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut browser = Self {
            path: path.clone(),
            entries: Vec::new(),
            show_hidden,
            history: History::new(),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            trash,
            event_tx,
            event_rx,
        };
        browser.show(path, true);
        browser
    }

    fn fallback_dir() -> PathBuf {
        std::env::current_dir()
            .ok()
            .or_else(dirs::home_dir)
            .and_then(|p| p.canonicalize().ok())
            .unwrap_or_else(|| PathBuf::from("/"))
    }

    fn emit(&self, event: BrowserEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Drain pending change notifications
    pub fn poll_events(&mut self) -> Vec<BrowserEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Display `path`, which must already be resolved
    fn show(&mut self, path: PathBuf, record: bool) {
        let moved = path != self.path;
        self.path = path;
        if record {
            self.history.record(&self.path);
        }
        if moved && !self.selection.is_empty() {
            self.selection.clear();
            self.emit(BrowserEvent::SelectionChanged(Vec::new()));
        }
        self.reload();
        debug!("showing {}", self.path.display());
        self.emit(BrowserEvent::LocationChanged(self.path.clone()));
    }

    fn reload(&mut self) {
        self.entries = filesystem::list_directory(&self.path, self.show_hidden);
        if self.selection.retain(|p| filesystem::exists(p)) {
            self.emit(BrowserEvent::SelectionChanged(self.selection.to_paths()));
        }
    }

    // Navigation
    /// Go to `path`, relative paths resolve against the current location
    pub fn navigate(&mut self, path: &Path) -> Result<(), FsError> {
        let resolved = resolve_directory(&self.path.join(path))?;
        self.show(resolved, true);
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), FsError> {
        let Some(target) = self.history.peek_back().map(Path::to_path_buf) else {
            return Ok(());
        };
        let resolved = resolve_directory(&target)?;
        self.history.back();
        self.show(resolved, false);
        Ok(())
    }

    pub fn forward(&mut self) -> Result<(), FsError> {
        let Some(target) = self.history.peek_forward().map(Path::to_path_buf) else {
            return Ok(());
        };
        let resolved = resolve_directory(&target)?;
        self.history.forward();
        self.show(resolved, false);
        Ok(())
    }

    pub fn up(&mut self) -> Result<(), FsError> {
        let Some(parent) = self.path.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        self.navigate(&parent)
    }

    pub fn home(&mut self) -> Result<(), FsError> {
        let home = dirs::home_dir().ok_or_else(|| FsError::NotFound(PathBuf::from("~")))?;
        self.navigate(&home)
    }

    /// Browse the trash content area
    pub fn open_trash(&mut self) -> Result<(), FsError> {
        let files_dir = self.trash.files_dir().to_path_buf();
        std::fs::create_dir_all(&files_dir).at(&files_dir)?;
        self.navigate(&files_dir)
    }

    /// Re-read the current location without touching history
    ///
    /// Falls back to the closest existing ancestor when the location vanished.
    pub fn refresh(&mut self) -> Result<(), FsError> {
        match resolve_directory(&self.path) {
            Ok(resolved) => {
                self.show(resolved, false);
                Ok(())
            }
            Err(err) => {
                let ancestor = self
                    .path
                    .ancestors()
                    .skip(1)
                    .find_map(|p| resolve_directory(p).ok());
                match ancestor {
                    Some(ancestor) => {
                        warn!("{} vanished, moving to {}", self.path.display(), ancestor.display());
                        self.show(ancestor, true);
                        Ok(())
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Navigate into directories, hand files to `opener`
    pub fn open(&mut self, path: &Path, opener: &dyn Opener) -> Result<(), FsError> {
        let path = self.path.join(path);
        if path.is_dir() {
            return self.navigate(&path);
        }
        if !filesystem::exists(&path) {
            return Err(FsError::NotFound(path));
        }
        debug!("opening {}", path.display());
        opener.open(&path).at(&path)
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        self.show_hidden = show_hidden;
        self.reload();
        self.emit(BrowserEvent::LocationChanged(self.path.clone()));
    }

    // Selection
    /// Replace the selection, relative paths resolve against the current location
    pub fn select(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        let base = self.path.clone();
        self.selection.set(paths.into_iter().map(|p| base.join(p)));
        self.emit(BrowserEvent::SelectionChanged(self.selection.to_paths()));
    }

    pub fn clear_selection(&mut self) {
        self.select(Vec::new());
    }

    // Queries
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    pub fn selected_paths(&self) -> &[PathBuf] {
        self.selection.paths()
    }

    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn trash(&self) -> &TrashStore {
        &self.trash
    }

    pub fn status_line(&self) -> String {
        if self.selection.is_empty() {
            format!("Location: {} | Items: {}", self.path.display(), self.item_count())
        } else {
            format!("Selected: {} item(s)", self.selection.len())
        }
    }
}

fn resolve_directory(path: &Path) -> Result<PathBuf, FsError> {
    let resolved = path.canonicalize().at(path)?;
    if !resolved.is_dir() {
        return Err(FsError::NotADirectory(resolved));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::ErrorKind;
    use crate::interact::fake::RecordingOpener;

    pub(super) struct Fixture {
        pub dir: tempfile::TempDir,
        pub root: PathBuf,
    }

    impl Fixture {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().canonicalize().unwrap().join("home");
            fs::create_dir_all(&root).unwrap();
            Self { dir, root }
        }

        pub fn dir(&self, name: &str) -> PathBuf {
            let path = self.root.join(name);
            fs::create_dir_all(&path).unwrap();
            path
        }

        pub fn browser(&self) -> Browser {
            let trash = TrashStore::new(self.dir.path().join("Trash"));
            Browser::new(Some(self.root.clone()), trash, false)
        }
    }

    #[test]
    fn test_starts_at_resolved_path() {
        let fx = Fixture::new();
        let mut browser = fx.browser();

        assert_eq!(browser.current_path(), fx.root);
        assert_eq!(browser.history().len(), 1);
        assert_eq!(
            browser.poll_events(),
            vec![BrowserEvent::LocationChanged(fx.root.clone())]
        );
    }

    #[test]
    fn test_invalid_start_falls_back() {
        let fx = Fixture::new();
        let trash = TrashStore::new(fx.dir.path().join("Trash"));
        let browser = Browser::new(Some(fx.root.join("missing")), trash, false);
        assert!(browser.current_path().is_dir());
    }

    #[test]
    fn test_history_scenario() {
        let fx = Fixture::new();
        let (a, b, c, d) = (fx.dir("a"), fx.dir("b"), fx.dir("c"), fx.dir("d"));
        let mut browser = fx.browser();

        browser.navigate(&a).unwrap();
        browser.navigate(&b).unwrap();
        browser.navigate(&c).unwrap();
        browser.back().unwrap();
        browser.back().unwrap();
        assert_eq!(browser.current_path(), a);

        browser.navigate(&d).unwrap();
        browser.forward().unwrap();
        assert_eq!(browser.current_path(), d);
        assert!(!browser.history().can_go_forward());
        assert!(!browser.history().entries().contains(&b));
        assert!(!browser.history().entries().contains(&c));
    }

    #[test]
    fn test_navigate_rejects_missing_and_files() {
        let fx = Fixture::new();
        fs::write(fx.root.join("file.txt"), "").unwrap();
        let mut browser = fx.browser();

        let err = browser.navigate(Path::new("nowhere")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = browser.navigate(Path::new("file.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);

        assert_eq!(browser.current_path(), fx.root);
        assert_eq!(browser.history().len(), 1);
    }

    #[test]
    fn test_navigate_same_path_does_not_duplicate() {
        let fx = Fixture::new();
        let mut browser = fx.browser();
        browser.navigate(&fx.root).unwrap();
        browser.navigate(Path::new(".")).unwrap();
        assert_eq!(browser.history().len(), 1);
    }

    #[test]
    fn test_back_to_vanished_directory_keeps_cursor() {
        let fx = Fixture::new();
        let gone = fx.dir("gone");
        let mut browser = fx.browser();
        browser.navigate(&gone).unwrap();
        browser.navigate(&fx.root).unwrap();
        fs::remove_dir(&gone).unwrap();

        assert_eq!(browser.back().unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(browser.current_path(), fx.root);
        assert_eq!(browser.history().cursor(), 2);
    }

    #[test]
    fn test_up_and_root() {
        let fx = Fixture::new();
        let child = fx.dir("child");
        let mut browser = fx.browser();
        browser.navigate(&child).unwrap();

        browser.up().unwrap();
        assert_eq!(browser.current_path(), fx.root);

        browser.navigate(Path::new("/")).unwrap();
        let before = browser.history().len();
        browser.up().unwrap();
        assert_eq!(browser.current_path(), Path::new("/"));
        assert_eq!(browser.history().len(), before);
    }

    #[test]
    fn test_refresh_preserves_history_position() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        let mut browser = fx.browser();
        browser.navigate(&a).unwrap();
        browser.back().unwrap();
        browser.poll_events();

        fs::write(fx.root.join("new.txt"), "").unwrap();
        browser.refresh().unwrap();

        assert_eq!(browser.history().len(), 2);
        assert_eq!(browser.history().cursor(), 0);
        assert!(browser.entries().iter().any(|e| e.name == "new.txt"));
        assert_eq!(
            browser.poll_events(),
            vec![BrowserEvent::LocationChanged(fx.root.clone())]
        );
    }

    #[test]
    fn test_refresh_falls_back_to_ancestor() {
        let fx = Fixture::new();
        let doomed = fx.dir("doomed");
        let mut browser = fx.browser();
        browser.navigate(&doomed).unwrap();
        fs::remove_dir(&doomed).unwrap();

        browser.refresh().unwrap();
        assert_eq!(browser.current_path(), fx.root);
    }

    #[test]
    fn test_selection_events_and_reset_on_navigation() {
        let fx = Fixture::new();
        fs::write(fx.root.join("a.txt"), "").unwrap();
        let sub = fx.dir("sub");
        let mut browser = fx.browser();
        browser.poll_events();

        browser.select(vec![PathBuf::from("a.txt")]);
        assert_eq!(browser.selected_paths(), &[fx.root.join("a.txt")]);
        assert!(browser.status_line().starts_with("Selected: 1"));

        browser.navigate(&sub).unwrap();
        assert!(browser.selected_paths().is_empty());
        assert_eq!(
            browser.poll_events(),
            vec![
                BrowserEvent::SelectionChanged(vec![fx.root.join("a.txt")]),
                BrowserEvent::SelectionChanged(Vec::new()),
                BrowserEvent::LocationChanged(sub.clone()),
            ]
        );
    }

    #[test]
    fn test_hidden_entries_and_item_count() {
        let fx = Fixture::new();
        fs::write(fx.root.join(".hidden"), "").unwrap();
        fs::write(fx.root.join("shown"), "").unwrap();
        let mut browser = fx.browser();

        assert_eq!(browser.item_count(), 1);
        browser.set_show_hidden(true);
        assert_eq!(browser.item_count(), 2);
        assert_eq!(
            browser.status_line(),
            format!("Location: {} | Items: 2", fx.root.display())
        );
    }

    #[test]
    fn test_open_dispatches_by_kind() {
        let fx = Fixture::new();
        let sub = fx.dir("sub");
        fs::write(fx.root.join("readme.md"), "").unwrap();
        let opener = RecordingOpener::default();
        let mut browser = fx.browser();

        browser.open(Path::new("readme.md"), &opener).unwrap();
        assert_eq!(*opener.opened.borrow(), vec![fx.root.join("readme.md")]);
        assert_eq!(browser.current_path(), fx.root);

        browser.open(Path::new("sub"), &opener).unwrap();
        assert_eq!(browser.current_path(), sub);
        assert_eq!(opener.opened.borrow().len(), 1);

        let err = browser.open(Path::new("ghost"), &opener).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_open_trash_creates_and_enters_files_area() {
        let fx = Fixture::new();
        let mut browser = fx.browser();

        browser.open_trash().unwrap();
        assert_eq!(
            browser.current_path(),
            fx.dir.path().canonicalize().unwrap().join("Trash/files")
        );
    }
}
