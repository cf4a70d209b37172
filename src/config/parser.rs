use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::directives::{self, DirectiveContext, DirectiveError};
use super::lexer::{Lexer, LexerOptions};
use super::token::{Token, TokenKind};
use crate::models::{
    color::{ColorTable, X11Colors},
    settings::Settings,
};

/// Name of the configuration file looked up in the home directory
pub const DEFAULT_CONFIG_NAME: &str = ".cwmrc";

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("File IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Lexical { line: usize, message: String },

    #[error("line {line}: unexpected token {token}")]
    UnexpectedToken { line: usize, token: String },

    #[error("line {line}: unknown directive {name:?}")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: {directive} expects {expected} argument(s), found {found}")]
    MissingArguments {
        line: usize,
        directive: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {directive} expects {expected} argument(s), found extra argument {token:?}")]
    TooManyArguments {
        line: usize,
        directive: &'static str,
        expected: usize,
        token: String,
    },

    #[error("line {line}: {directive}: {source}")]
    Directive {
        line: usize,
        directive: &'static str,
        #[source]
        source: DirectiveError,
    },
}

impl ConfigParseError {
    /// Line the error was detected on, when it came from the input text
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigParseError::Io(_) => None,
            ConfigParseError::Lexical { line, .. }
            | ConfigParseError::UnexpectedToken { line, .. }
            | ConfigParseError::UnknownDirective { line, .. }
            | ConfigParseError::MissingArguments { line, .. }
            | ConfigParseError::TooManyArguments { line, .. }
            | ConfigParseError::Directive { line, .. } => Some(*line),
        }
    }
}

/// A failed parse: the error plus everything applied before it
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ParseFailure {
    /// Settings as they stood when parsing stopped
    pub settings: Settings,
    #[source]
    pub error: ConfigParseError,
}

impl ParseFailure {
    pub fn into_parts(self) -> (Settings, ConfigParseError) {
        (self.settings, self.error)
    }
}

/// A non-fatal problem noticed while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treat a quoted string that runs to end of input as an error
    pub strict_quotes: bool,
}

/// Reads configuration text into [`Settings`].
///
/// Each statement is a directive name followed by exactly the number of
/// arguments the directive declares. Parsing stops at the first error.
pub struct ConfigParser<'c> {
    colors: &'c dyn ColorTable,
    options: ParserOptions,
    warnings: Vec<ParseWarning>,
}

static BUILTIN_COLORS: X11Colors = X11Colors;

impl ConfigParser<'static> {
    /// A parser resolving colour names with the built-in X11 table
    pub fn new() -> Self {
        ConfigParser::with_colors(&BUILTIN_COLORS)
    }
}

impl Default for ConfigParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> ConfigParser<'c> {
    pub fn with_colors(colors: &'c dyn ColorTable) -> Self {
        ConfigParser {
            colors,
            options: ParserOptions::default(),
            warnings: Vec::new(),
        }
    }

    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn get_warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Parse `input` into fresh settings.
    ///
    /// On failure the settings built up to the failing statement are returned
    /// inside the [`ParseFailure`].
    pub fn parse_str(&mut self, input: &str) -> Result<Settings, ParseFailure> {
        let mut settings = Settings::default();
        match self.parse_into(input, &mut settings) {
            Ok(()) => Ok(settings),
            Err(error) => Err(ParseFailure { settings, error }),
        }
    }

    /// Parse `input`, applying each directive to `settings` as it is read.
    ///
    /// Nothing is rolled back on error.
    #[instrument(skip_all)]
    pub fn parse_into(&mut self, input: &str, settings: &mut Settings) -> Result<(), ConfigParseError> {
        self.warnings.clear();
        let lexer_options = LexerOptions {
            strict_quotes: self.options.strict_quotes,
        };
        let mut lexer = Lexer::with_options(input, lexer_options);
        let mut statements = 0usize;

        loop {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::String => {}
                TokenKind::EndOfInput => {
                    info!(statements, warnings = self.warnings.len(), "configuration parsed");
                    return Ok(());
                }
                TokenKind::Error => return Err(lexical_error(token)),
                TokenKind::Terminator => {
                    return Err(ConfigParseError::UnexpectedToken {
                        line: token.line,
                        token: token.to_string(),
                    })
                }
            }

            let line = token.line;
            let directive =
                directives::lookup(&token.text).ok_or_else(|| ConfigParseError::UnknownDirective {
                    line,
                    name: token.text.clone(),
                })?;
            let args = expect_arguments(&mut lexer, directive.name, directive.arity, line)?;

            let mut notes = Vec::new();
            let mut context = DirectiveContext {
                settings: &mut *settings,
                colors: self.colors,
                warnings: &mut notes,
            };
            directive
                .apply(&mut context, &args)
                .map_err(|source| ConfigParseError::Directive {
                    line,
                    directive: directive.name,
                    source,
                })?;

            debug!(line, directive = directive.name, ?args, "applied directive");
            self.warnings
                .extend(notes.into_iter().map(|message| ParseWarning { line, message }));
            statements += 1;
        }
    }

    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Result<Settings, ParseFailure> {
        self.warnings.clear();
        let mut content = String::new();
        if let Err(error) = reader.read_to_string(&mut content) {
            return Err(ParseFailure {
                settings: Settings::default(),
                error: error.into(),
            });
        }
        self.parse_str(&content)
    }

    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Settings, ParseFailure> {
        let path = path.as_ref();
        self.warnings.clear();
        debug!(path = %path.display(), "reading configuration file");
        match fs::read_to_string(path) {
            Ok(content) => self.parse_str(&content),
            Err(error) => Err(ParseFailure {
                settings: Settings::default(),
                error: error.into(),
            }),
        }
    }
}

/// Parse with the built-in colour table and default options
pub fn parse_str(input: &str) -> Result<Settings, ParseFailure> {
    ConfigParser::new().parse_str(input)
}

/// `~/.cwmrc`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_NAME))
}

fn lexical_error(token: Token) -> ConfigParseError {
    ConfigParseError::Lexical {
        line: token.line,
        message: token.text,
    }
}

/// Collect exactly `arity` string tokens followed by a terminator
fn expect_arguments(
    lexer: &mut Lexer<'_>,
    directive: &'static str,
    arity: usize,
    line: usize,
) -> Result<Vec<String>, ConfigParseError> {
    let mut args = Vec::with_capacity(arity);

    while args.len() < arity {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::String => args.push(token.text),
            TokenKind::Error => return Err(lexical_error(token)),
            TokenKind::Terminator | TokenKind::EndOfInput => {
                return Err(ConfigParseError::MissingArguments {
                    line,
                    directive,
                    expected: arity,
                    found: args.len(),
                })
            }
        }
    }

    let token = lexer.next_token();
    match token.kind {
        TokenKind::Terminator | TokenKind::EndOfInput => Ok(args),
        TokenKind::Error => Err(lexical_error(token)),
        TokenKind::String => Err(ConfigParseError::TooManyArguments {
            line,
            directive,
            expected: arity,
            token: token.text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{color::Rgb, keyspec::KeySpec};
    use std::collections::HashMap;

    #[test]
    fn test_end_to_end() {
        let input = "borderwidth 2\n\
                     color active blue\n\
                     bind C-q quit\n\
                     bind C-q unmap\n\
                     gap 4 4 4 4\n\
                     sticky yes\n";
        let settings = parse_str(input).unwrap();

        assert_eq!(settings.border_width, 2);
        assert_eq!(settings.colors.len(), 1);
        assert_eq!(settings.color("active"), Some(Rgb::new(0, 0, 0xff)));
        assert!(settings.binds.is_empty());
        assert_eq!(settings.gap.top, 4);
        assert_eq!(settings.gap.bottom, 4);
        assert_eq!(settings.gap.left, 4);
        assert_eq!(settings.gap.right, 4);
        assert!(settings.sticky);
    }

    #[test]
    fn test_unknown_color_keeps_partial_settings() {
        let failure = parse_str("borderwidth 3\ncolor bg notacolor\nsnapdist 9\n").unwrap_err();
        let (settings, error) = failure.into_parts();

        assert!(error.to_string().contains("notacolor"));
        assert_eq!(error.line(), Some(2));
        assert!(matches!(error, ConfigParseError::Directive { directive: "color", .. }));
        assert_eq!(settings.border_width, 3);
        assert!(settings.color("bg").is_none());
        assert_eq!(settings.snap_distance, 0);
    }

    #[test]
    fn test_unknown_directive() {
        let failure = parse_str("\n\nbordercolor red\n").unwrap_err();
        match failure.error {
            ConfigParseError::UnknownDirective { line, ref name } => {
                assert_eq!(line, 3);
                assert_eq!(name, "bordercolor");
            }
            ref other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_few_arguments() {
        let failure = parse_str("borderwidth\nsnapdist 3\n").unwrap_err();
        assert!(matches!(
            failure.error,
            ConfigParseError::MissingArguments {
                directive: "borderwidth",
                expected: 1,
                found: 0,
                ..
            }
        ));
        assert_eq!(failure.settings.border_width, 0);

        let failure = parse_str("gap 1 2 3").unwrap_err();
        assert!(matches!(
            failure.error,
            ConfigParseError::MissingArguments { found: 3, .. }
        ));
        assert_eq!(failure.settings.gap.top, 0);
    }

    #[test]
    fn test_too_many_arguments() {
        let failure = parse_str("borderwidth 1 2\n").unwrap_err();
        match failure.error {
            ConfigParseError::TooManyArguments { ref token, .. } => assert_eq!(token, "2"),
            ref other => panic!("unexpected error: {other}"),
        }
        assert_eq!(failure.settings.border_width, 0);
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let input = "\n\n# leading comment\n\nborderwidth 1\n\n\n# between\n\n\nsnapdist 2 # trailing\n\n";
        let settings = parse_str(input).unwrap();
        assert_eq!(settings.border_width, 1);
        assert_eq!(settings.snap_distance, 2);
    }

    #[test]
    fn test_quoted_arguments() {
        let settings = parse_str("command greet \"hello # world\"\nfontname \"DejaVu Sans Mono:size=10\"\n").unwrap();
        assert_eq!(settings.commands["greet"], "hello # world");
        assert_eq!(settings.font, "DejaVu Sans Mono:size=10");
    }

    #[test]
    fn test_strict_quotes() {
        let input = "fontname \"mono";
        assert_eq!(parse_str(input).unwrap().font, "mono");

        let mut parser = ConfigParser::new().options(ParserOptions {
            strict_quotes: true,
        });
        let failure = parser.parse_str(input).unwrap_err();
        assert!(matches!(failure.error, ConfigParseError::Lexical { line: 1, .. }));
    }

    #[test]
    fn test_lexical_error_in_directive_position() {
        let mut parser = ConfigParser::new().options(ParserOptions {
            strict_quotes: true,
        });
        let failure = parser.parse_str("sticky yes\n\"open").unwrap_err();
        match failure.error {
            ConfigParseError::Lexical { line, ref message } => {
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"), "{message}");
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(failure.settings.sticky);
    }

    #[test]
    fn test_io_error_clears_previous_warnings() {
        let mut parser = ConfigParser::new();
        parser.parse_str("bind CQ-x close\n").unwrap();
        assert_eq!(parser.get_warnings().len(), 1);

        let bytes: &[u8] = &[0xff];
        assert!(parser.parse_reader(bytes).is_err());
        assert!(parser.get_warnings().is_empty());

        parser.parse_str("bind CQ-x close\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(parser.parse_file(dir.path().join("missing")).is_err());
        assert!(parser.get_warnings().is_empty());
    }

    #[test]
    fn test_warnings_carry_line_numbers() {
        let mut parser = ConfigParser::new();
        let settings = parser.parse_str("sticky no\nbind CQ-x close\n").unwrap();
        assert_eq!(
            settings.binding(&"C-x".parse::<KeySpec>().unwrap()),
            Some("close")
        );
        let warnings = parser.get_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 2);
    }

    #[test]
    fn test_injected_colors() {
        let mut table = HashMap::new();
        table.insert("brand".to_string(), Rgb::new(1, 2, 3));

        let mut parser = ConfigParser::with_colors(&table);
        let settings = parser.parse_str("color activeborder Brand\n").unwrap();
        assert_eq!(settings.color("activeborder"), Some(Rgb::new(1, 2, 3)));
        assert!(parser.parse_str("color activeborder blue\n").is_err());
    }

    #[test]
    fn test_parse_into_mutates_in_place() {
        let mut settings = Settings::default();
        settings.font = "fixed".to_string();

        let mut parser = ConfigParser::new();
        let result = parser.parse_into("ignore xclock\nmoveamount lots\n", &mut settings);
        assert!(result.is_err());
        assert_eq!(settings.font, "fixed");
        assert_eq!(settings.ignores, vec!["xclock"]);
        assert_eq!(settings.move_amount, 1);
    }

    #[test]
    fn test_parse_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'b', 0xff, 0xfe];
        let failure = ConfigParser::new().parse_reader(bytes).unwrap_err();
        assert!(matches!(failure.error, ConfigParseError::Io(_)));
    }
}
