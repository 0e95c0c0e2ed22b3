#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    List,
    ChangeDirectory(String),
    Back,
    Forward,
    Up,
    Home,
    Refresh,
    Select(Vec<String>),
    Copy,
    Cut,
    Paste,
    Delete,
    Rename,
    NewFolder(Option<String>),
    NewFile(Option<String>),
    Open(String),
    ToggleHidden,
    EnableHidden,
    DisableHidden,
    OpenTrash,
    TrashList,
    Restore(String),
    Purge(String),
    EmptyTrash,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
ls                 list the current directory
cd <path>          change directory
back, forward      move through history
up, home           parent / home directory
select <names..>   select entries (no names clears)
copy, cut, paste   clipboard
rm                 move selection to trash
rename             rename the first selected entry
mkdir [name]       create a folder
touch [name]       create an empty file
open <name>        open a file or enter a directory
hidden [on|off]    show or hide dotfiles
trash, trash-list  open the trash / list its items
restore <name>     restore a trashed item
purge <name>       permanently delete a trashed item
empty-trash        permanently delete trashed items
refresh            reload the listing
quit               exit";

/// Parse one line typed at the prompt
pub fn parse_command(line: &str) -> Action {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => Action::None,
        "ls" | "l" => Action::List,
        "cd" if rest.is_empty() => Action::Home,
        "cd" => Action::ChangeDirectory(rest.to_string()),
        "back" | "b" => Action::Back,
        "forward" | "fw" => Action::Forward,
        "up" | ".." => Action::Up,
        "home" | "~" => Action::Home,
        "refresh" | "r" => Action::Refresh,
        "select" | "sel" => Action::Select(rest.split_whitespace().map(String::from).collect()),
        "copy" | "yy" => Action::Copy,
        "cut" | "dd" => Action::Cut,
        "paste" | "p" => Action::Paste,
        "rm" | "delete" => Action::Delete,
        "rename" | "mv" => Action::Rename,
        "mkdir" => Action::NewFolder(optional(rest)),
        "touch" => Action::NewFile(optional(rest)),
        "open" | "o" if !rest.is_empty() => Action::Open(rest.to_string()),
        "hidden" => match rest {
            "" | "toggle" => Action::ToggleHidden,
            "on" | "yes" | "true" => Action::EnableHidden,
            "off" | "no" | "false" => Action::DisableHidden,
            _ => Action::Unknown(line.to_string()),
        },
        // vim-style aliases for the hidden toggle
        "set" | "se" => match rest {
            "hidden" | "hid" => Action::EnableHidden,
            "nohidden" | "nohid" => Action::DisableHidden,
            _ => Action::Unknown(line.to_string()),
        },
        "trash" => Action::OpenTrash,
        "trash-list" | "tl" => Action::TrashList,
        "restore" if !rest.is_empty() => Action::Restore(rest.to_string()),
        "purge" if !rest.is_empty() => Action::Purge(rest.to_string()),
        "empty-trash" => Action::EmptyTrash,
        "help" | "?" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        _ => Action::Unknown(line.to_string()),
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}
