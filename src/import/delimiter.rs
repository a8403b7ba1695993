use std::fmt;

/// Field separator for a whole file, chosen once from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    /// Comma if present, else semicolon if present, else tab.
    pub fn sniff(first_line: &str) -> Self {
        if first_line.contains(',') {
            Self::Comma
        } else if first_line.contains(';') {
            Self::Semicolon
        } else {
            Self::Tab
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
