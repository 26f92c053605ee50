//! Directive tokenizer.
//!
//! Turns a directive string such as `required,default=a\,b` into a flat
//! token stream. The tokenizer knows nothing about labels or values; it only
//! distinguishes the two structural characters (`=` and `,`), literal runs,
//! and the end of input. A backslash escapes exactly the next character.

/// A single lexical unit of a directive string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Token {
    /// `=` outside an escape.
    Assign,

    /// `,` outside an escape.
    Separator,

    /// A run of literal characters. Adjacent literals are merged.
    Literal(String),

    /// Always the last token, emitted exactly once.
    End,
}

/// Escape-aware scanner for directive strings.
#[derive(Debug, Default)]
pub(crate) struct Tokenizer {
    escaping: bool,
}

impl Tokenizer {
    /// Scans `input` into tokens, terminated by [`Token::End`].
    pub(crate) fn tokenize(mut self, input: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for chr in input.chars() {
            let token = match chr {
                '=' => self.assign(),
                ',' => self.separator(),
                '\\' => match self.escape() {
                    Some(token) => token,
                    None => continue,
                },
                other => self.literal(other),
            };

            if let (Some(Token::Literal(run)), Token::Literal(next)) = (tokens.last_mut(), &token) {
                run.push_str(next);
                continue;
            }

            tokens.push(token);
        }

        tokens.push(Token::End);
        tokens
    }

    fn assign(&mut self) -> Token {
        if self.escaping {
            return self.literal('=');
        }

        Token::Assign
    }

    fn separator(&mut self) -> Token {
        if self.escaping {
            return self.literal(',');
        }

        Token::Separator
    }

    /// Starts an escape, or emits a literal backslash when already escaping.
    fn escape(&mut self) -> Option<Token> {
        if self.escaping {
            return Some(self.literal('\\'));
        }

        self.escaping = true;
        None
    }

    // A pending escape is consumed by any character, even one with no
    // special meaning: `\x` yields `x`.
    fn literal(&mut self, chr: char) -> Token {
        self.escaping = false;
        Token::Literal(chr.to_string())
    }
}
