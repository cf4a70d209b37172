//! The directive table and the handlers behind each directive.
//!
//! Every handler is called with exactly as many arguments as the table
//! declares for it; the parser enforces the count before dispatching.

use std::num::ParseIntError;
use tracing::warn;

use crate::models::{
    client_spec::{ClientSpec, ClientSpecError},
    color::ColorTable,
    keyspec::{KeySpec, KeySpecError},
    settings::Settings,
};

/// Command value that removes a binding instead of setting one
pub const UNMAP: &str = "unmap";

/// State a handler is allowed to touch
pub struct DirectiveContext<'a> {
    pub settings: &'a mut Settings,
    pub colors: &'a dyn ColorTable,
    /// Non-fatal diagnostics raised while applying the directive
    pub warnings: &'a mut Vec<String>,
}

type Handler = fn(&mut DirectiveContext<'_>, &[String]) -> Result<(), DirectiveError>;

/// One entry of the directive table
pub struct Directive {
    pub name: &'static str,
    pub arity: usize,
    handler: Handler,
}

impl Directive {
    pub fn apply(
        &self,
        context: &mut DirectiveContext<'_>,
        args: &[String],
    ) -> Result<(), DirectiveError> {
        if args.len() != self.arity {
            return Err(DirectiveError::WrongArgumentCount {
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.handler)(context, args)
    }
}

impl std::fmt::Debug for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directive")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

pub static DIRECTIVES: &[Directive] = &[
    Directive { name: "autogroup", arity: 2, handler: autogroup },
    Directive { name: "bind", arity: 2, handler: bind },
    Directive { name: "borderwidth", arity: 1, handler: border_width },
    Directive { name: "color", arity: 2, handler: color },
    Directive { name: "command", arity: 2, handler: command },
    Directive { name: "fontname", arity: 1, handler: font_name },
    Directive { name: "gap", arity: 4, handler: gap },
    Directive { name: "ignore", arity: 1, handler: ignore },
    Directive { name: "mousebind", arity: 2, handler: mouse_bind },
    Directive { name: "moveamount", arity: 1, handler: move_amount },
    Directive { name: "snapdist", arity: 1, handler: snap_distance },
    Directive { name: "sticky", arity: 1, handler: sticky },
];

/// Find a directive by its exact name
pub fn lookup(name: &str) -> Option<&'static Directive> {
    DIRECTIVES.iter().find(|directive| directive.name == name)
}

/// Semantic errors raised by directive handlers
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("invalid integer {value:?}")]
    InvalidInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unknown color name {0:?}")]
    UnknownColor(String),

    #[error("invalid keyspec {spec:?}: {reason}")]
    InvalidKeySpec { spec: String, reason: KeySpecError },

    #[error(transparent)]
    InvalidClientSpec(#[from] ClientSpecError),

    #[error("invalid value {value:?}, expected one of {expected}")]
    InvalidChoice {
        value: String,
        expected: &'static str,
    },

    #[error("expected {expected} argument(s), got {found}")]
    WrongArgumentCount { expected: usize, found: usize },
}

fn parse_int(value: &str) -> Result<i32, DirectiveError> {
    value
        .parse()
        .map_err(|source| DirectiveError::InvalidInteger {
            value: value.to_string(),
            source,
        })
}

fn parse_keyspec(context: &mut DirectiveContext<'_>, spec: &str) -> Result<KeySpec, DirectiveError> {
    let parsed = KeySpec::parse(spec).map_err(|reason| DirectiveError::InvalidKeySpec {
        spec: spec.to_string(),
        reason,
    })?;

    if !parsed.ignored.is_empty() {
        let ignored: String = parsed.ignored.iter().collect();
        warn!(keyspec = spec, ignored = %ignored, "ignoring unrecognized modifiers");
        context.warnings.push(format!(
            "keyspec {:?}: ignoring unrecognized modifier(s) {:?}",
            spec, ignored
        ));
    }

    Ok(parsed.spec)
}

fn autogroup(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    let group = parse_int(&args[0])?;
    let client: ClientSpec = args[1].parse()?;
    context.settings.autogroups.insert(client, group);
    Ok(())
}

fn bind(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    let key = parse_keyspec(context, &args[0])?;
    if args[1] == UNMAP {
        context.settings.binds.remove(&key);
    } else {
        context.settings.binds.insert(key, args[1].clone());
    }
    Ok(())
}

fn border_width(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.border_width = parse_int(&args[0])?;
    Ok(())
}

fn color(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    let rgb = context
        .colors
        .resolve(&args[1].to_lowercase())
        .ok_or_else(|| DirectiveError::UnknownColor(args[1].clone()))?;
    context.settings.colors.insert(args[0].clone(), rgb);
    Ok(())
}

fn command(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context
        .settings
        .commands
        .insert(args[0].clone(), args[1].clone());
    Ok(())
}

fn font_name(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.font = args[0].clone();
    Ok(())
}

fn gap(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    let top = parse_int(&args[0])?;
    let bottom = parse_int(&args[1])?;
    let left = parse_int(&args[2])?;
    let right = parse_int(&args[3])?;

    let gap = &mut context.settings.gap;
    gap.top = top;
    gap.bottom = bottom;
    gap.left = left;
    gap.right = right;
    Ok(())
}

fn ignore(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.ignores.push(args[0].clone());
    Ok(())
}

fn mouse_bind(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    let key = parse_keyspec(context, &args[0])?;
    let mouse_binds = &mut context.settings.mouse_binds;

    if args[1] == UNMAP {
        // Only the first command bound to this keyspec is dropped.
        let bound = mouse_binds
            .iter()
            .find(|(_, bound_key)| **bound_key == key)
            .map(|(command, _)| command.clone());
        if let Some(command) = bound {
            mouse_binds.remove(&command);
        }
    } else {
        mouse_binds.insert(args[1].clone(), key);
    }
    Ok(())
}

fn move_amount(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.move_amount = parse_int(&args[0])?;
    Ok(())
}

fn snap_distance(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.snap_distance = parse_int(&args[0])?;
    Ok(())
}

fn sticky(context: &mut DirectiveContext<'_>, args: &[String]) -> Result<(), DirectiveError> {
    context.settings.sticky = match args[0].as_str() {
        "yes" => true,
        "no" => false,
        _ => {
            return Err(DirectiveError::InvalidChoice {
                value: args[0].clone(),
                expected: "yes, no",
            })
        }
    };
    Ok(())
}
