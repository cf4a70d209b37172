//! Character-level scanner for configuration text.
//!
//! The lexer is pull based: each call to [`Lexer::next_token`] scans just far
//! enough to produce one token. Statements end at a newline or at the end of
//! the input, blank lines collapse into a single terminator and `#` starts a
//! comment outside quotes.

use std::iter::{FusedIterator, Peekable};
use std::str::Chars;
use tracing::trace;

use super::token::{Token, TokenKind};

/// Options controlling how strictly the input is scanned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Report a quoted string left open at end of input as an error instead
    /// of returning what was read so far
    pub strict_quotes: bool,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    last_was_terminator: bool,
    done: bool,
    options: LexerOptions,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    pub fn with_options(input: &'a str, options: LexerOptions) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            // Leading blank lines must not produce an empty statement.
            last_was_terminator: true,
            done: false,
            options,
        }
    }

    /// Current 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan the next token.
    ///
    /// Once an `EndOfInput` or `Error` token has been returned, every further
    /// call returns `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        if self.done {
            return Token::end_of_input(self.line);
        }

        let token = self.scan_text();
        trace!(line = token.line, token = %token, "scanned token");

        self.last_was_terminator = token.kind == TokenKind::Terminator;
        if matches!(token.kind, TokenKind::EndOfInput | TokenKind::Error) {
            self.done = true;
        }
        token
    }

    fn scan_text(&mut self) -> Token {
        loop {
            let Some(&c) = self.chars.peek() else {
                // The last statement may end without a newline.
                return if self.last_was_terminator {
                    Token::end_of_input(self.line)
                } else {
                    Token::terminator(self.line)
                };
            };

            match c {
                ' ' | '\t' | '\r' => {
                    self.chars.next();
                }
                '#' => self.skip_comment(),
                '\n' => {
                    self.chars.next();
                    let line = self.line;
                    self.line += 1;
                    if !self.last_was_terminator {
                        return Token::terminator(line);
                    }
                }
                '"' => {
                    self.chars.next();
                    if let Some(token) = self.scan_quoted() {
                        return token;
                    }
                }
                _ => {
                    if let Some(token) = self.scan_bare() {
                        return token;
                    }
                }
            }
        }
    }

    /// Discard up to, but not including, the next newline
    fn skip_comment(&mut self) {
        while self.chars.next_if(|&c| c != '\n').is_some() {}
    }

    fn scan_quoted(&mut self) -> Option<Token> {
        let line = self.line;
        let mut text = String::new();

        loop {
            match self.chars.next() {
                None => {
                    if self.options.strict_quotes {
                        return Some(Token::error(
                            format!("unterminated quoted string starting on line {}", line),
                            line,
                        ));
                    }
                    return (!text.is_empty()).then(|| Token::string(text, line));
                }
                Some('"') => return Some(Token::string(text, line)),
                Some('\\') => {
                    if let Some(escaped) = self.next_escaped() {
                        text.push(escaped);
                    }
                }
                Some('\n') => {
                    self.line += 1;
                    text.push('\n');
                }
                Some(c) => text.push(c),
            }
        }
    }

    /// A backslash in a bare token is dropped and lets the next newline, however
    /// far ahead, continue the token. It does not escape blanks or `#`.
    fn scan_bare(&mut self) -> Option<Token> {
        let line = self.line;
        let mut text = String::new();
        let mut multiline = false;

        while let Some(&c) = self.chars.peek() {
            match c {
                '\r' if multiline => {
                    self.chars.next();
                    if self.chars.peek() != Some(&'\n') {
                        break;
                    }
                }
                '\n' if multiline => {
                    self.chars.next();
                    self.line += 1;
                    multiline = false;
                }
                ' ' | '\t' | '\r' | '\n' | '#' => break,
                '\\' => {
                    self.chars.next();
                    multiline = true;
                }
                _ => {
                    self.chars.next();
                    text.push(c);
                }
            }
        }

        (!text.is_empty()).then(|| Token::string(text, line))
    }

    /// Consume the character after a backslash. A newline (or CRLF) is a
    /// line continuation and yields nothing.
    fn next_escaped(&mut self) -> Option<char> {
        match self.chars.next()? {
            '\n' => {
                self.line += 1;
                None
            }
            '\r' if self.chars.peek() == Some(&'\n') => {
                self.chars.next();
                self.line += 1;
                None
            }
            c => Some(c),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        Some(self.next_token())
    }
}

impl FusedIterator for Lexer<'_> {}

/// Scan a whole input into tokens, ending with `EndOfInput` or `Error`
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}
