//! Configuration parsing for cwmrc
//!
//! Text flows through the [`lexer`] into the [`parser`], which looks each
//! statement up in the [`directives`] table and applies it to the settings.

pub mod directives;
pub mod lexer;
pub mod parser;
pub mod token;

pub use directives::{Directive, DirectiveError, DIRECTIVES};
pub use lexer::{Lexer, LexerOptions};
pub use parser::{
    default_config_path, parse_str, ConfigParseError, ConfigParser, ParseFailure, ParseWarning,
    ParserOptions,
};
pub use token::{Token, TokenKind};
