//! `.trashinfo` sidecar records

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, Timelike};

pub const TRASHINFO_EXTENSION: &str = "trashinfo";
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const HEADER: &str = "[Trash Info]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrashInfo {
    pub original_path: PathBuf,
    pub deletion_date: NaiveDateTime,
}

impl TrashInfo {
    /// Record for an entry deleted right now, second precision
    pub fn now(original_path: PathBuf) -> Self {
        let now = Local::now().naive_local();
        Self {
            original_path,
            deletion_date: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}\nPath={}\nDeletionDate={}\n",
            HEADER,
            self.original_path.display(),
            self.deletion_date.format(DATE_FORMAT)
        )
    }

    pub fn parse(content: &str) -> Option<Self> {
        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
        if lines.next()? != HEADER {
            return None;
        }

        let mut original_path = None;
        let mut deletion_date = None;
        for line in lines {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "Path" => original_path = Some(PathBuf::from(value)),
                "DeletionDate" => {
                    deletion_date = NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT).ok()
                }
                _ => {}
            }
        }

        Some(Self {
            original_path: original_path?,
            deletion_date: deletion_date?,
        })
    }
}
