//! Parsing of a typed command line
//!
//! `treatment add Ibuprofeno | after lunch` becomes the command `treatment`
//! with arguments `add Ibuprofeno | after lunch`. Multi-field arguments are
//! separated with `|`.

/// One parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: String,
}

impl Invocation {
    /// Returns None for blank lines
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (line, ""),
        };
        Some(Self {
            name: name.to_lowercase(),
            args: args.to_string(),
        })
    }

    /// First word of the arguments and the remainder
    pub fn subcommand(&self) -> (&str, &str) {
        match self.args.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (self.args.as_str(), ""),
        }
    }
}

/// Split `|`-separated fields, trimming each one
pub fn fields(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    args.split('|').map(str::trim).collect()
}
