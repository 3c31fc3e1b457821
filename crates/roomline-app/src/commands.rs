//! Slash commands typed into the input line.

/// A submitted input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/connect`: open a fresh connection.
    Connect,
    /// `/disconnect`: close the connection.
    Disconnect,
    /// `/toggle`: connect or disconnect.
    Toggle,
    /// `/quit`: exit.
    Quit,
    /// Unrecognized `/name`.
    Unknown(String),
    /// Chat text to send.
    Message(String),
}

impl Command {
    /// Parse a trimmed, non-empty input line.
    pub fn parse(text: &str) -> Self {
        let Some(rest) = text.strip_prefix('/') else {
            return Self::Message(text.to_string());
        };

        let name = rest.split_whitespace().next().unwrap_or_default();
        match name {
            "connect" => Self::Connect,
            "disconnect" => Self::Disconnect,
            "toggle" => Self::Toggle,
            "quit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}
