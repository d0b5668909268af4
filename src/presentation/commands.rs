// Line commands typed into the terminal session
use thiserror::Error;

pub const USAGE: &str = "commands: tab <view> | set <control> <value> | check <control> on|off | \
resize | theme | print | export <table> [filename] | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(String),
    Set { control: String, value: String },
    Check { control: String, checked: bool },
    Resize,
    Theme,
    Print,
    Export { table: String, filename: Option<String> },
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (name, tail) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let tail = tail.trim_start();
    let (first, rest) = tail.split_once(char::is_whitespace).unwrap_or((tail, ""));
    let first = Some(first).filter(|s| !s.is_empty());
    let rest = Some(rest.trim()).filter(|s| !s.is_empty());

    match name {
        "tab" => first
            .map(|v| Command::Tab(v.to_string()))
            .ok_or(CommandError::Usage("tab <view>")),
        "set" => match (first, rest) {
            (Some(control), Some(value)) => Ok(Command::Set {
                control: control.to_string(),
                value: value.to_string(),
            }),
            (Some(control), None) => Ok(Command::Set {
                control: control.to_string(),
                value: String::new(),
            }),
            _ => Err(CommandError::Usage("set <control> <value>")),
        },
        "check" => {
            let checked = match rest {
                Some("on") | Some("true") => true,
                Some("off") | Some("false") => false,
                _ => return Err(CommandError::Usage("check <control> on|off")),
            };
            first
                .map(|control| Command::Check {
                    control: control.to_string(),
                    checked,
                })
                .ok_or(CommandError::Usage("check <control> on|off"))
        }
        "resize" => Ok(Command::Resize),
        "theme" => Ok(Command::Theme),
        "print" => Ok(Command::Print),
        "export" => first
            .map(|table| Command::Export {
                table: table.to_string(),
                filename: rest.map(str::to_string),
            })
            .ok_or(CommandError::Usage("export <table> [filename]")),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
