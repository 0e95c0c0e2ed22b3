//! Line-oriented console front-end over the browser controller

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use fmcore::config::{SavedSettings, expand_home};
use fmcore::filesystem::{format_modified, format_size};
use fmcore::{Browser, BrowserEvent, FsError, Opener, Prompt, Severity};

use crate::input::{Action, HELP, parse_command};

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Exit,
}

/// Reads answers and commands from `reader`, writes to `writer`
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Next line without its terminator, `None` at end of input
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                warn!("failed to read input: {}", e);
                None
            }
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.writer, "{} ", question);
        let _ = self.writer.flush();
        self.read_line()
    }

    fn say(&mut self, message: impl std::fmt::Display) {
        let _ = writeln!(self.writer, "{}", message);
    }
}

impl<R: BufRead, W: Write> Prompt for Console<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        self.ask(&format!("{} [y/N]", message))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn input(&mut self, message: &str, initial: &str) -> Option<String> {
        let question = if initial.is_empty() {
            message.to_string()
        } else {
            format!("{} [{}]", message, initial)
        };
        let answer = self.ask(&question)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            Some(answer.to_string())
        } else if !initial.is_empty() {
            Some(initial.to_string())
        } else {
            None
        }
    }
}

pub struct App<R, W> {
    browser: Browser,
    opener: Box<dyn Opener>,
    console: Console<R, W>,
    /// Where `hidden` toggles are persisted, `None` disables saving
    settings_path: Option<PathBuf>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        browser: Browser,
        opener: Box<dyn Opener>,
        console: Console<R, W>,
        settings_path: Option<PathBuf>,
    ) -> Self {
        Self {
            browser,
            opener,
            console,
            settings_path,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.browser.poll_events();
        let status = self.browser.status_line();
        self.console.say(status);

        loop {
            write!(self.console.writer, "> ")?;
            self.console.writer.flush()?;
            let Some(line) = self.console.read_line() else {
                writeln!(self.console.writer)?;
                break;
            };

            let action = parse_command(&line);
            let result = self.execute(action);
            self.print_events();
            if result == CommandResult::Exit {
                break;
            }
        }

        info!("session finished in {}", self.browser.current_path().display());
        Ok(())
    }

    pub fn execute(&mut self, action: Action) -> CommandResult {
        debug!("executing {:?}", action);
        let result = match action {
            Action::None => Ok(()),
            Action::List => {
                self.list();
                Ok(())
            }
            Action::ChangeDirectory(path) => self.browser.navigate(&expand_home(&path)),
            Action::Back => self.browser.back(),
            Action::Forward => self.browser.forward(),
            Action::Up => self.browser.up(),
            Action::Home => self.browser.home(),
            Action::Refresh => self.browser.refresh(),
            Action::Select(names) => {
                self.browser.select(names.into_iter().map(PathBuf::from));
                Ok(())
            }
            Action::Copy => {
                let count = self.browser.copy_selected();
                self.console.say(format!("{} item(s) copied", count));
                Ok(())
            }
            Action::Cut => {
                let count = self.browser.cut_selected();
                self.console.say(format!("{} item(s) cut", count));
                Ok(())
            }
            Action::Paste => self.paste(),
            Action::Delete => self.delete(),
            Action::Rename => self
                .browser
                .rename_selected(&mut self.console)
                .map(|path| self.console.say(format!("renamed to {}", path.display()))),
            Action::NewFolder(name) => {
                let created = match name {
                    Some(name) => self.browser.create_folder(&name),
                    None => self.browser.new_folder(&mut self.console),
                };
                created.map(|path| self.console.say(format!("created {}", path.display())))
            }
            Action::NewFile(name) => {
                let created = match name {
                    Some(name) => self.browser.create_file(&name),
                    None => self.browser.new_file(&mut self.console),
                };
                created.map(|path| self.console.say(format!("created {}", path.display())))
            }
            Action::Open(name) => self.browser.open(Path::new(&name), self.opener.as_ref()),
            Action::ToggleHidden => {
                self.set_hidden(!self.browser.show_hidden());
                Ok(())
            }
            Action::EnableHidden => {
                self.set_hidden(true);
                Ok(())
            }
            Action::DisableHidden => {
                self.set_hidden(false);
                Ok(())
            }
            Action::OpenTrash => self.browser.open_trash(),
            Action::TrashList => {
                self.list_trash();
                Ok(())
            }
            Action::Restore(name) => self
                .browser
                .restore_from_trash(&name)
                .map(|path| self.console.say(format!("restored {}", path.display()))),
            Action::Purge(name) => self
                .browser
                .purge_from_trash(&name, &mut self.console)
                .map(|()| self.console.say(format!("purged {}", name))),
            Action::EmptyTrash => self
                .browser
                .empty_trash(&mut self.console)
                .map(|count| self.console.say(format!("{} item(s) deleted", count))),
            Action::Help => {
                self.console.say(HELP);
                Ok(())
            }
            Action::Quit => return CommandResult::Exit,
            Action::Unknown(line) => {
                self.console
                    .say(format!("unknown command: {} (try 'help')", line));
                Ok(())
            }
        };

        if let Err(err) = result {
            self.report(&err);
        }
        CommandResult::Continue
    }

    fn paste(&mut self) -> Result<(), FsError> {
        let report = self.browser.paste(&mut self.console)?;
        if !report.pasted.is_empty() {
            self.console
                .say(format!("{} item(s) pasted", report.pasted.len()));
        }
        for path in &report.missing {
            self.console
                .say(format!("skipped {}: no longer exists", path.display()));
        }
        for path in &report.declined {
            self.console.say(format!("kept {}", path.display()));
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<(), FsError> {
        let report = self.browser.delete_selected(&mut self.console)?;
        if !report.trashed.is_empty() {
            self.console
                .say(format!("{} item(s) moved to trash", report.trashed.len()));
        }
        for (_, err) in &report.failed {
            self.report(err);
        }
        Ok(())
    }

    fn list(&mut self) {
        let lines: Vec<String> = self
            .browser
            .entries()
            .iter()
            .map(|entry| {
                let name = if entry.is_dir() {
                    format!("{}/", entry.name)
                } else {
                    entry.name.clone()
                };
                let size = if entry.is_dir() {
                    "-".to_string()
                } else {
                    format_size(entry.size)
                };
                format!("{:>8}  {}  {}", size, format_modified(entry.modified), name)
            })
            .collect();
        for line in lines {
            self.console.say(line);
        }
        let status = self.browser.status_line();
        self.console.say(status);
    }

    fn list_trash(&mut self) {
        let items = self.browser.trash_items();
        if items.is_empty() {
            self.console.say("trash is empty");
            return;
        }
        for item in items {
            self.console.say(format!(
                "{}  {}  {}",
                item.deletion_date.format("%Y-%m-%d %H:%M"),
                item.name,
                item.original_path.display()
            ));
        }
    }

    fn set_hidden(&mut self, show_hidden: bool) {
        self.browser.set_show_hidden(show_hidden);

        let Some(path) = &self.settings_path else {
            return;
        };
        let saved = SavedSettings {
            show_hidden: Some(show_hidden),
        };
        if let Err(e) = saved.save_to(path) {
            warn!("failed to save config: {}", e);
            self.console.say(format!("warning: failed to save config: {}", e));
        }
    }

    fn report(&mut self, err: &FsError) {
        match err.severity() {
            Severity::Silent => debug!("{}", err),
            Severity::Warning => {
                warn!("{}", err);
                self.console.say(format!("warning: {}", err));
            }
            Severity::Error => {
                error!("{}", err);
                self.console.say(format!("error: {}", err));
                if let FsError::Aggregate(errors) = err {
                    for inner in errors {
                        self.console.say(format!("  {}", inner));
                    }
                }
            }
        }
    }

    fn print_events(&mut self) {
        for event in self.browser.poll_events() {
            match event {
                BrowserEvent::LocationChanged(path) => {
                    debug!("location changed to {}", path.display());
                }
                BrowserEvent::SelectionChanged(paths) => {
                    self.console.say(format!("Selected: {} item(s)", paths.len()));
                }
            }
        }
    }

    #[cfg(test)]
    fn browser(&self) -> &Browser {
        &self.browser
    }
}
