//! Command tokenizer

/// A tokenized command line.
///
/// `args[0]` is the command token and the rest are positional parameters.
/// `quoted` holds the double-quoted tokens in order; the first one is the
/// primary payload (post text, launch target) and the second the secondary
/// payload (alias name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInput {
    pub raw: String,
    pub args: Vec<String>,
    pub quoted: Vec<String>,
}

impl CommandInput {
    /// Split a raw line on whitespace outside double quotes.
    ///
    /// Quotes are stripped from `args`. An unterminated quote runs to the
    /// end of the line.
    pub fn parse(raw: &str) -> Self {
        let mut args = Vec::new();
        let mut quoted = Vec::new();

        let mut current = String::new();
        let mut in_token = false;
        let mut in_quotes = false;
        let mut token_quoted = false;

        for ch in raw.chars() {
            match ch {
                '"' => {
                    in_quotes = !in_quotes;
                    in_token = true;
                    token_quoted = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if in_token {
                        Self::finish(&mut current, token_quoted, &mut args, &mut quoted);
                        in_token = false;
                        token_quoted = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            }
        }
        if in_token {
            Self::finish(&mut current, token_quoted, &mut args, &mut quoted);
        }

        Self {
            raw: raw.to_string(),
            args,
            quoted,
        }
    }

    /// Build from an argument vector whose quoting was already removed by a shell.
    /// Every parameter after the command counts as quoted.
    pub fn from_args(argv: Vec<String>) -> Self {
        let quoted = argv.iter().skip(1).cloned().collect();
        Self {
            raw: argv.join(" "),
            args: argv,
            quoted,
        }
    }

    fn finish(
        current: &mut String,
        token_quoted: bool,
        args: &mut Vec<String>,
        quoted: &mut Vec<String>,
    ) {
        let token = std::mem::take(current);
        if token_quoted {
            quoted.push(token.clone());
        }
        args.push(token);
    }

    /// The command token, if any
    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Positional argument `i` (1 is the first parameter after the command)
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn primary(&self) -> Option<&str> {
        self.quoted.first().map(String::as_str)
    }

    pub fn secondary(&self) -> Option<&str> {
        self.quoted.get(1).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
