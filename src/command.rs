//! Text protocol parsing: one space-separated command per line.

/// A parsed protocol command.
///
/// Argument tokens are carried as raw strings; each handler owns the
/// validation of its own arguments (coordinate parsing, empty names).
/// Tokens missing from the line are carried as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { name: String },
    Logout { name: String },
    Attack { x: String, y: String },
}

impl Command {
    /// Parse a single protocol line.
    ///
    /// Splits on single spaces. Returns `None` for lines that are silently
    /// ignored: more than 3 tokens, or a command name outside the known set.
    /// The command name matches case-insensitively.
    pub fn parse(line: &str) -> Option<Command> {
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() > 3 {
            return None;
        }
        let arg = |index: usize| tokens.get(index).copied().unwrap_or("").to_string();
        match tokens[0].to_ascii_lowercase().as_str() {
            "login" => Some(Command::Login { name: arg(1) }),
            "logout" => Some(Command::Logout { name: arg(1) }),
            "attack" => Some(Command::Attack {
                x: arg(1),
                y: arg(2),
            }),
            _ => None,
        }
    }
}
