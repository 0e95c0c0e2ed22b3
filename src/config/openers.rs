//! File opener configuration

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::saved::SavedSettings;
use crate::interact::Opener;

const DEFAULT_OPENER: &str = "xdg-open {}";

/// Maps mime type patterns to shell commands
///
/// Loaded from the `[openers]` table of the config file, e.g.
/// `"image/*" = "imv {}"`. Exact patterns win over wildcards.
#[derive(Clone, Debug, Default)]
pub struct Openers {
    rules: Vec<(String, String)>,
}

impl Openers {
    /// Load openers from config file
    pub fn load() -> Self {
        Self::from_table(&SavedSettings::load_existing())
    }

    pub fn from_table(table: &toml::Table) -> Self {
        let mut rules = Vec::new();

        if let Some(toml::Value::Table(openers)) = table.get("openers") {
            for (pattern, value) in openers {
                if let toml::Value::String(cmd) = value {
                    rules.push((pattern.clone(), cmd.clone()));
                }
            }
        }

        Self::sort_rules(&mut rules);
        Self { rules }
    }

    fn sort_rules(rules: &mut [(String, String)]) {
        rules.sort_by(|a, b| {
            let a_wild = a.0.contains('*');
            let b_wild = b.0.contains('*');
            match (a_wild, b_wild) {
                (false, true) => std::cmp::Ordering::Less,
                (true, false) => std::cmp::Ordering::Greater,
                _ => a.0.cmp(&b.0),
            }
        });
    }

    /// Get the opener command template for a file path
    pub fn get_opener(&self, path: &Path) -> &str {
        let mime = detect_mime(path);

        self.rules
            .iter()
            .find(|(pattern, _)| matches_pattern(&mime, pattern))
            .map(|(_, cmd)| cmd.as_str())
            .unwrap_or(DEFAULT_OPENER)
    }

    fn command_for(&self, path: &Path) -> String {
        let quoted = quote(&path.to_string_lossy());
        let template = self.get_opener(path);
        if template.contains("{}") {
            template.replace("{}", &quoted)
        } else {
            format!("{} {}", template, quoted)
        }
    }
}

impl Opener for Openers {
    fn open(&self, path: &Path) -> io::Result<()> {
        let command = self.command_for(path);
        debug!("running opener: {}", command);

        Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

fn detect_mime(path: &Path) -> String {
    if path.extension().is_some()
        && let Some(mime) = mime_guess::from_path(path).first()
    {
        return mime.to_string();
    }

    if let Ok(Some(kind)) = infer::get_from_path(path) {
        return kind.mime_type().to_string();
    }

    String::new()
}

fn matches_pattern(mime: &str, pattern: &str) -> bool {
    if pattern == mime {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix("/*")
        && let Some(mime_type) = mime.split('/').next()
    {
        return mime_type == prefix;
    }

    false
}

/// Single-quote for `sh -c`
fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
