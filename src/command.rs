//! Line commands for the interactive session
//!
//! Plain lines replace the query; lines starting with `/` are commands. A
//! literal leading slash can be typed as `//`.

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// New value of the input box
    Input(String),
    /// Record the current query as a recent search
    Submit,
    /// Select the suggestion at a 1-based position
    Select(usize),
    Down,
    Up,
    /// Enter: select the highlighted suggestion or submit
    Enter,
    /// Escape: close the dropdown
    Escape,
    Focus,
    Clear,
    ShowRecent,
    ClearRecent,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one input line (without its newline).
    pub fn parse(line: &str) -> Result<Self, String> {
        if let Some(literal) = line.strip_prefix("//") {
            return Ok(SessionCommand::Input(format!("/{}", literal)));
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(SessionCommand::Input(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let argument = parts.next();

        let parsed = match name {
            "submit" => SessionCommand::Submit,
            "select" => {
                let position = argument
                    .and_then(|arg| arg.parse::<usize>().ok())
                    .filter(|position| *position > 0)
                    .ok_or_else(|| "Usage: /select N (N starts at 1)".to_string())?;
                SessionCommand::Select(position)
            }
            "down" => SessionCommand::Down,
            "up" => SessionCommand::Up,
            "enter" => SessionCommand::Enter,
            "esc" => SessionCommand::Escape,
            "focus" => SessionCommand::Focus,
            "clear" => SessionCommand::Clear,
            "recent" => match argument {
                None => SessionCommand::ShowRecent,
                Some("clear") => SessionCommand::ClearRecent,
                Some(other) => return Err(format!("Unknown /recent option: {}", other)),
            },
            "help" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("Unknown command: /{} (try /help)", other)),
        };
        Ok(parsed)
    }
}

pub const HELP_TEXT: &str = "\
Type a query to see suggestions. Commands:
  /submit       save the current query as a recent search
  /select N     select suggestion N
  /down, /up    move the highlight
  /enter        select the highlighted suggestion, or submit
  /esc          close the suggestions
  /focus        reopen the suggestions
  /clear        clear the query
  /recent       show recent searches (/recent clear to forget them)
  /quit         exit
Start a line with // to type a literal leading slash.";
