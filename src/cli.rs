//! Command-line argument parsing

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use fmcore::config::Settings;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub path: Option<PathBuf>,
    pub hidden: bool,
    pub trash_dir: Option<PathBuf>,
}

impl Args {
    /// Command-line flags override the config file
    pub fn apply_to(&self, settings: &mut Settings) {
        if self.hidden {
            settings.show_hidden = true;
        }
        if let Some(dir) = &self.trash_dir {
            settings.trash_dir = Some(dir.clone());
        }
    }
}

pub fn cli() -> Command {
    Command::new("fmcore")
        .about("fmcore - file manager with trash, clipboard and history")
        .args([
            // NOTE: arguments
            Arg::new("path")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("directory to open on startup"),
            // NOTE: options
            Arg::new("hidden")
                .long("hidden")
                .short('a')
                .action(ArgAction::SetTrue)
                .help("show hidden entries"),
            Arg::new("trash-dir")
                .long("trash-dir")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("trash location instead of the per-user default"),
        ])
}

pub fn parse_args() -> Args {
    from_matches(&cli().get_matches())
}

fn from_matches(matches: &ArgMatches) -> Args {
    Args {
        path: matches.get_one("path").cloned(),
        hidden: matches.get_flag("hidden"),
        trash_dir: matches.get_one("trash-dir").cloned(),
    }
}
