use autozip_core::Msg;

/// What one typed line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the state machine.
    Dispatch(Msg),
    /// Print the current view again.
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &[(&str, &str)] = &[
    ("browse", "choose the output folder"),
    ("path <folder>", "type the output folder directly"),
    ("pack", "start packing into the chosen folder"),
    ("shutdown", "stop the packaging server"),
    ("status", "show the current state again"),
    ("help", "list commands"),
    ("quit", "leave the client (the server keeps running)"),
];

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "browse" | "b" => Command::Dispatch(Msg::BrowseClicked),
        // An empty argument clears the field.
        "path" | "p" => Command::Dispatch(Msg::PathInputChanged(rest.to_string())),
        "pack" | "start" => Command::Dispatch(Msg::PackClicked),
        "shutdown" => Command::Dispatch(Msg::ShutdownClicked),
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    }
}
