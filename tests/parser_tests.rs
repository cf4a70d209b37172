//! Integration tests for configuration parsing
//!
//! Drives whole configuration files through the public API and checks the
//! resulting settings, the errors and the partially applied state.

use cwmrc::{
    config::{ConfigParseError, ConfigParser, ParserOptions},
    models::{ClientSpec, Gap, KeySpec, Modifier, Rgb, Settings},
    parse_str,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

/// A configuration touching every directive
fn create_full_config() -> String {
    r#"# cwm configuration
fontname "DejaVu Sans Mono:pixelsize=14"
borderwidth 2
snapdist 8
moveamount 5
sticky yes
gap 20 0 4 4

color activeborder SteelBlue
color inactiveborder "dark slate gray"

command term "xterm -bg black"
command lock "xlock -mode blank"

autogroup 1 xterm.XTerm
autogroup 2 Firefox

ignore xclock
ignore xconsole

bind CM-Return term
bind 4-l lock
bind M-Tab unmap

mousebind M-1 window_move
mousebind CM-3 window_resize
"#
    .to_string()
}

#[test]
fn test_full_config() {
    let settings = parse_str(&create_full_config()).unwrap();

    assert_eq!(settings.font, "DejaVu Sans Mono:pixelsize=14");
    assert_eq!(settings.border_width, 2);
    assert_eq!(settings.snap_distance, 8);
    assert_eq!(settings.move_amount, 5);
    assert!(settings.sticky);
    assert_eq!(settings.gap, Gap::new(20, 0, 4, 4));

    assert_eq!(settings.color("activeborder"), Some(Rgb::from_packed(0x4682b4)));
    assert_eq!(settings.color("inactiveborder"), Some(Rgb::from_packed(0x2f4f4f)));

    assert_eq!(settings.commands["term"], "xterm -bg black");
    assert_eq!(settings.commands["lock"], "xlock -mode blank");

    assert_eq!(settings.group_for_window("xterm", "XTerm"), Some(1));
    assert_eq!(settings.autogroup(&ClientSpec::class("Firefox")), Some(2));

    assert_eq!(settings.ignores, vec!["xclock", "xconsole"]);

    assert_eq!(settings.binds.len(), 2);
    assert_eq!(
        settings.binding(&KeySpec::new([Modifier::Control, Modifier::Mod1], "Return")),
        Some("term")
    );
    assert_eq!(settings.binding(&KeySpec::new([Modifier::Mod4], "l")), Some("lock"));

    assert_eq!(
        settings.mouse_binding("window_resize"),
        Some(&KeySpec::new([Modifier::Control, Modifier::Mod1], "3"))
    );
}

#[test]
fn test_parsing_is_deterministic() {
    let config = create_full_config();
    assert_eq!(parse_str(&config).unwrap(), parse_str(&config).unwrap());
}

#[test]
fn test_empty_config_gives_defaults() {
    assert_eq!(parse_str("").unwrap(), Settings::default());
    assert_eq!(parse_str("\n\n# nothing here\n\n").unwrap(), Settings::default());
}

#[test]
fn test_redeclaration_overwrites() {
    let settings = parse_str(
        "autogroup 1 XTerm\nautogroup 3 XTerm\n\
         bind C-t a\nbind C-t b\n\
         command t one\ncommand t two\n\
         color bg red\ncolor bg green\n",
    )
    .unwrap();

    assert_eq!(settings.autogroups.len(), 1);
    assert_eq!(settings.autogroup(&ClientSpec::class("XTerm")), Some(3));
    assert_eq!(settings.binds.len(), 1);
    assert_eq!(settings.binding(&"C-t".parse().unwrap()), Some("b"));
    assert_eq!(settings.commands.len(), 1);
    assert_eq!(settings.commands["t"], "two");
    assert_eq!(settings.colors.len(), 1);
    assert_eq!(settings.color("bg"), Some(Rgb::from_packed(0x00ff00)));
}

#[test]
fn test_unmap_unbound_key_is_noop() {
    let settings = parse_str("bind C-x unmap\nmousebind M-2 unmap\n").unwrap();
    assert!(settings.binds.is_empty());
    assert!(settings.mouse_binds.is_empty());
}

#[test]
fn test_color_case_insensitive() {
    let upper = parse_str("color bg White").unwrap();
    let lower = parse_str("color bg white").unwrap();
    assert_eq!(upper.colors, lower.colors);
}

#[test]
fn test_quoted_hash_is_kept() {
    let settings = parse_str("command greet \"hello # world\"").unwrap();
    assert_eq!(settings.commands["greet"], "hello # world");
}

#[test]
fn test_multiline_values() {
    let settings = parse_str("command long xterm\\\n-e\nsnapdist 1\n").unwrap();
    assert_eq!(settings.commands["long"], "xterm-e");
    assert_eq!(settings.snap_distance, 1);

    let settings = parse_str("ignore x\\term\nd\nsnapdist 2\n").unwrap();
    assert_eq!(settings.ignores, vec!["xtermd"]);
    assert_eq!(settings.snap_distance, 2);
}

#[test]
fn test_backslash_space_splits_argument() {
    let failure = parse_str("ignore two\\ words\n").unwrap_err();
    match failure.error {
        ConfigParseError::TooManyArguments { ref token, .. } => assert_eq!(token, "words"),
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(failure.settings.ignores.is_empty());
}

#[test]
fn test_borderwidth_arity() {
    for input in ["borderwidth\n", "borderwidth 1 2\n", "borderwidth"] {
        let failure = parse_str(input).unwrap_err();
        assert!(
            matches!(
                failure.error,
                ConfigParseError::MissingArguments { .. } | ConfigParseError::TooManyArguments { .. }
            ),
            "{input:?} gave {}",
            failure.error
        );
        assert_eq!(failure.settings.border_width, 0);
    }
}

#[test]
fn test_first_error_stops_parsing() {
    let failure = parse_str("sticky yes\nsticky maybe\nborderwidth 9\n").unwrap_err();
    assert_eq!(failure.error.line(), Some(2));
    assert!(failure.error.to_string().contains("maybe"));
    assert!(failure.settings.sticky);
    assert_eq!(failure.settings.border_width, 0);
}

#[test]
fn test_unknown_color_scenario() {
    let failure = parse_str("color bg notacolor").unwrap_err();
    assert!(failure.error.to_string().contains("notacolor"));
    assert!(failure.settings.color("bg").is_none());
}

#[test]
fn test_unknown_directive_names_token() {
    let failure = parse_str("borderwidth 1\nframewidth 2\n").unwrap_err();
    let message = failure.error.to_string();
    assert!(message.contains("framewidth"), "{message}");
    assert!(message.contains("line 2"), "{message}");
    assert_eq!(failure.settings.border_width, 1);
}

#[test]
fn test_custom_color_table() {
    let mut table = HashMap::new();
    table.insert("solarized-base03".to_string(), Rgb::from_packed(0x002b36));

    let settings = ConfigParser::with_colors(&table)
        .parse_str("color bg Solarized-Base03\n")
        .unwrap();
    assert_eq!(settings.color("bg"), Some(Rgb::from_packed(0x002b36)));
}

#[test]
fn test_strict_quotes_option() {
    let mut parser = ConfigParser::new().options(ParserOptions {
        strict_quotes: true,
    });
    assert!(parser.parse_str("fontname \"closed\"\n").is_ok());

    let failure = parser.parse_str("sticky yes\nfontname \"open\n").unwrap_err();
    assert!(matches!(failure.error, ConfigParseError::Lexical { line: 2, .. }));
    assert!(failure.settings.sticky);
}

#[test]
fn test_parse_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(create_full_config().as_bytes()).unwrap();

    let settings = ConfigParser::new().parse_file(file.path()).unwrap();
    assert_eq!(settings.border_width, 2);
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let failure = ConfigParser::new()
        .parse_file(dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(failure.error, ConfigParseError::Io(_)));
    assert_eq!(failure.settings, Settings::default());
}

#[test]
fn test_json_output_shape() {
    let settings = parse_str("bind CM-q quit\nautogroup 4 mutt.XTerm\nmousebind M-1 window_move\n").unwrap();
    let json = serde_json::to_value(&settings).unwrap();

    assert_eq!(json["binds"]["Control-Mod1-q"], "quit");
    assert_eq!(json["autogroups"]["mutt.XTerm"], 4);
    assert_eq!(json["mouse_binds"]["window_move"], "Mod1-1");
}
