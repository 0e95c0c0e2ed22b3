//! Clipboard for file operations

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::FsError;
use crate::filesystem;
use crate::interact::Prompt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClipboardMode {
    #[default]
    Copy,
    Cut,
}

/// What a paste did with each selected path
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasteReport {
    /// Destination paths written
    pub pasted: Vec<PathBuf>,
    /// Sources skipped because the user refused to overwrite
    pub declined: Vec<PathBuf>,
    /// Sources that vanished since they were copied
    pub missing: Vec<PathBuf>,
    /// Sources pasted onto themselves
    pub unchanged: Vec<PathBuf>,
}

/// Clipboard for copy/cut/paste operations
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    paths: BTreeSet<PathBuf>,
    mode: ClipboardMode,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, paths: impl IntoIterator<Item = PathBuf>, mode: ClipboardMode) {
        self.paths = paths.into_iter().collect();
        self.mode = mode;
    }

    pub fn copy(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.set(paths, ClipboardMode::Copy);
    }

    pub fn cut(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.set(paths, ClipboardMode::Cut);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.mode = ClipboardMode::Copy;
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    pub fn is_cut(&self) -> bool {
        self.mode == ClipboardMode::Cut
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Paste every selected path into `dest_dir`
    ///
    /// Existing names are only replaced when `prompt` agrees. The first
    /// failing item stops the paste; finished items are kept. A cut
    /// selection is consumed even when the paste fails.
    pub fn paste_to(
        &mut self,
        dest_dir: &Path,
        prompt: &mut dyn Prompt,
    ) -> Result<PasteReport, FsError> {
        let result = self.paste_each(dest_dir, prompt);

        if self.is_cut() {
            self.clear();
        }

        if let Ok(report) = &result {
            info!(
                "pasted {} item(s) into {} ({} declined, {} missing)",
                report.pasted.len(),
                dest_dir.display(),
                report.declined.len(),
                report.missing.len()
            );
        }
        result
    }

    fn paste_each(&self, dest_dir: &Path, prompt: &mut dyn Prompt) -> Result<PasteReport, FsError> {
        let mut report = PasteReport::default();

        for src in &self.paths {
            if !filesystem::exists(src) {
                debug!("skipping vanished {}", src.display());
                report.missing.push(src.clone());
                continue;
            }
            let Some(name) = src.file_name() else {
                continue;
            };
            let dest = dest_dir.join(name);

            if same_parent(src, dest_dir) {
                report.unchanged.push(src.clone());
                continue;
            }

            if src.is_dir() && filesystem::is_within(dest_dir, src) {
                return Err(FsError::Io {
                    path: src.clone(),
                    source: io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "cannot paste a directory into itself",
                    ),
                });
            }

            if filesystem::exists(&dest) {
                let question = format!("'{}' already exists. Overwrite?", name.to_string_lossy());
                if !prompt.confirm(&question) {
                    report.declined.push(src.clone());
                    continue;
                }
            }

            self.paste_one(src, &dest)
                .map_err(|err| FsError::failed(&dest, err))?;
            debug!("pasted {} -> {}", src.display(), dest.display());
            report.pasted.push(dest);
        }

        Ok(report)
    }

    fn paste_one(&self, src: &Path, dest: &Path) -> io::Result<()> {
        match self.mode {
            ClipboardMode::Cut => filesystem::move_entry(src, dest),
            ClipboardMode::Copy => {
                if filesystem::exists(dest) && src.is_dir() != dest.is_dir() {
                    filesystem::remove_entry(dest)?;
                }
                filesystem::copy_entry(src, dest)
            }
        }
    }
}

fn same_parent(src: &Path, dest_dir: &Path) -> bool {
    let Some(parent) = src.parent() else {
        return false;
    };
    match (parent.canonicalize(), dest_dir.canonicalize()) {
        (Ok(parent), Ok(dest_dir)) => parent == dest_dir,
        _ => parent == dest_dir,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::{ErrorKind, Severity};
    use crate::interact::fake::ScriptedPrompt;

    struct Fixture {
        _dir: tempfile::TempDir,
        src: PathBuf,
        dest: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        Fixture {
            _dir: dir,
            src,
            dest,
        }
    }

    #[test]
    fn test_copy_paste_keeps_selection() {
        let fx = fixture();
        let file = fx.src.join("a.txt");
        fs::write(&file, "a").unwrap();
        let other = fx.dest.join("other");
        fs::create_dir_all(&other).unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![file.clone()]);
        let mut prompt = ScriptedPrompt::default();

        clipboard.paste_to(&fx.dest, &mut prompt).unwrap();
        clipboard.paste_to(&other, &mut prompt).unwrap();

        assert!(file.exists());
        assert!(fx.dest.join("a.txt").exists());
        assert!(other.join("a.txt").exists());
        assert!(!clipboard.is_empty());
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_cut_paste_clears_selection() {
        let fx = fixture();
        let file = fx.src.join("a.txt");
        fs::write(&file, "a").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![file.clone()]);
        let report = clipboard
            .paste_to(&fx.dest, &mut ScriptedPrompt::default())
            .unwrap();

        assert!(!file.exists());
        assert_eq!(report.pasted, vec![fx.dest.join("a.txt")]);
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.mode(), ClipboardMode::Copy);
    }

    #[test]
    fn test_conflict_declined_by_default() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), "new").unwrap();
        fs::write(fx.dest.join("a.txt"), "old").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![fx.src.join("a.txt")]);
        let mut prompt = ScriptedPrompt::default();
        let report = clipboard.paste_to(&fx.dest, &mut prompt).unwrap();

        assert_eq!(prompt.asked, vec!["'a.txt' already exists. Overwrite?"]);
        assert_eq!(report.declined.len(), 1);
        assert_eq!(fs::read_to_string(fx.dest.join("a.txt")).unwrap(), "old");
    }

    #[test]
    fn test_conflict_overwrite_approved() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), "new").unwrap();
        fs::write(fx.dest.join("a.txt"), "old").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![fx.src.join("a.txt")]);
        clipboard
            .paste_to(&fx.dest, &mut ScriptedPrompt::confirming(&[true]))
            .unwrap();

        assert_eq!(fs::read_to_string(fx.dest.join("a.txt")).unwrap(), "new");
        assert!(!fx.src.join("a.txt").exists());
    }

    #[test]
    fn test_copy_directory_merges_into_existing() {
        let fx = fixture();
        let d = fx.src.join("D");
        fs::create_dir_all(&d).unwrap();
        fs::write(d.join("f"), "from source").unwrap();
        let existing = fx.dest.join("D");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("g"), "already here").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![d.clone()]);
        clipboard
            .paste_to(&fx.dest, &mut ScriptedPrompt::confirming(&[true]))
            .unwrap();

        assert_eq!(fs::read_to_string(existing.join("f")).unwrap(), "from source");
        assert_eq!(fs::read_to_string(existing.join("g")).unwrap(), "already here");
        assert!(d.join("f").exists());
    }

    #[test]
    fn test_vanished_sources_are_skipped() {
        let fx = fixture();
        let gone = fx.src.join("gone.txt");
        let here = fx.src.join("here.txt");
        fs::write(&here, "").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![gone.clone(), here]);
        let report = clipboard
            .paste_to(&fx.dest, &mut ScriptedPrompt::default())
            .unwrap();

        assert_eq!(report.missing, vec![gone]);
        assert_eq!(report.pasted, vec![fx.dest.join("here.txt")]);
    }

    #[test]
    fn test_paste_into_same_directory_is_unchanged() {
        let fx = fixture();
        let file = fx.src.join("a.txt");
        fs::write(&file, "content").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![file.clone()]);
        let mut prompt = ScriptedPrompt::confirming(&[true]);
        let report = clipboard.paste_to(&fx.src, &mut prompt).unwrap();

        assert_eq!(report.unchanged, vec![file.clone()]);
        assert!(prompt.asked.is_empty());
        assert_eq!(fs::read_to_string(&file).unwrap(), "content");
    }

    #[test]
    fn test_paste_directory_into_itself_fails_and_cut_is_cleared() {
        let fx = fixture();
        let inner = fx.src.join("inner");
        fs::create_dir_all(&inner).unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![fx.src.clone()]);
        let err = clipboard
            .paste_to(&inner, &mut ScriptedPrompt::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(fx.src.exists());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_paste_into_removed_directory_is_reported() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), "a").unwrap();
        let gone = fx.dest.join("gone");

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![fx.src.join("a.txt")]);
        let err = clipboard
            .paste_to(&gone, &mut ScriptedPrompt::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_ne!(err.severity(), Severity::Silent);
        assert!(err.to_string().contains("gone"));
        assert!(fx.src.join("a.txt").exists());
    }

    #[test]
    fn test_first_failure_stops_paste_and_keeps_finished_items() {
        let fx = fixture();
        let m = fx.src.join("m");
        let inner = m.join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(fx.src.join("a.txt"), "a").unwrap();
        fs::write(fx.src.join("z.txt"), "z").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![fx.src.join("z.txt"), m.clone(), fx.src.join("a.txt")]);
        let result = clipboard.paste_to(&inner, &mut ScriptedPrompt::default());

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(inner.join("a.txt")).unwrap(), "a");
        assert!(!fx.src.join("a.txt").exists());
        assert!(fx.src.join("z.txt").exists());
        assert!(!inner.join("z.txt").exists());
        assert!(m.is_dir());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_copy_file_over_directory_replaces_it() {
        let fx = fixture();
        fs::write(fx.src.join("x"), "file").unwrap();
        fs::create_dir_all(fx.dest.join("x")).unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy(vec![fx.src.join("x")]);
        clipboard
            .paste_to(&fx.dest, &mut ScriptedPrompt::confirming(&[true]))
            .unwrap();

        assert!(fx.dest.join("x").is_file());
    }
}
