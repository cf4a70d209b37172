use std::fmt;

/// Kinds of lexical units produced by the [`Lexer`](super::lexer::Lexer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare or quoted word, already unescaped
    String,
    /// End of a statement
    Terminator,
    /// End of the input; always the last token
    EndOfInput,
    /// Malformed input; the text holds the message
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::String => "string",
            TokenKind::Terminator => "terminator",
            TokenKind::EndOfInput => "eof",
            TokenKind::Error => "error",
        })
    }
}

/// A single token with its kind, payload and the line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn string(text: impl Into<String>, line: usize) -> Self {
        Token {
            kind: TokenKind::String,
            text: text.into(),
            line,
        }
    }

    pub fn terminator(line: usize) -> Self {
        Token {
            kind: TokenKind::Terminator,
            text: String::new(),
            line,
        }
    }

    pub fn end_of_input(line: usize) -> Self {
        Token {
            kind: TokenKind::EndOfInput,
            text: String::new(),
            line,
        }
    }

    pub fn error(message: impl Into<String>, line: usize) -> Self {
        Token {
            kind: TokenKind::Error,
            text: message.into(),
            line,
        }
    }

    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::String
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            kind => write!(f, "({}) {:?}", kind, self.text),
        }
    }
}
