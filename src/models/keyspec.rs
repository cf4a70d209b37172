use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Modifier keys that can qualify a key or mouse binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// Control key (`C`)
    Control,
    /// Shift key (`S`)
    Shift,
    /// Mod1, usually Alt/Meta (`M`)
    Mod1,
    /// Mod4, usually Super/Windows (`4`)
    Mod4,
}

impl Modifier {
    /// Map a single modifier character from a keyspec prefix
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Modifier::Control),
            'S' => Some(Modifier::Shift),
            'M' => Some(Modifier::Mod1),
            '4' => Some(Modifier::Mod4),
            _ => None,
        }
    }

    /// Name used by the X keyboard layer
    pub fn x_name(&self) -> &'static str {
        match self {
            Modifier::Control => "Control",
            Modifier::Shift => "Shift",
            Modifier::Mod1 => "Mod1",
            Modifier::Mod4 => "Mod4",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.x_name())
    }
}

/// A key (or mouse button) together with the modifiers that must be held.
///
/// Modifiers are kept in a set, so `CM-q` and `MC-q` are the same binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub modifiers: BTreeSet<Modifier>,
    pub key: String,
}

/// A parsed keyspec plus the prefix characters that were not modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeySpec {
    pub spec: KeySpec,
    pub ignored: Vec<char>,
}

impl KeySpec {
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: impl Into<String>) -> Self {
        KeySpec {
            modifiers: modifiers.into_iter().collect(),
            key: key.into(),
        }
    }

    /// A keyspec with no modifiers
    pub fn bare(key: impl Into<String>) -> Self {
        KeySpec {
            modifiers: BTreeSet::new(),
            key: key.into(),
        }
    }

    /// Parse `mods-key` or a bare `key`.
    ///
    /// The split happens at the last `-` that is not the final character, so
    /// `C-M-q` has the prefix `C-M` and `C--` binds the `-` key. Any other
    /// spec ending in `-` (`C-`, `C-M-`) has no key and is rejected. Every
    /// prefix character is read on its own; unknown ones are dropped from the
    /// spec and returned in [`ParsedKeySpec::ignored`].
    pub fn parse(spec: &str) -> Result<ParsedKeySpec, KeySpecError> {
        if spec.is_empty() {
            return Err(KeySpecError::Empty);
        }
        if spec.ends_with('-') && spec != "-" && !spec.ends_with("--") {
            return Err(KeySpecError::MissingKey);
        }

        let (prefix, key) = split_keyspec(spec);
        let mut modifiers = BTreeSet::new();
        let mut ignored = Vec::new();

        for c in prefix.chars() {
            match Modifier::from_char(c) {
                Some(modifier) => {
                    modifiers.insert(modifier);
                }
                None if c == '-' => {}
                None => ignored.push(c),
            }
        }

        Ok(ParsedKeySpec {
            spec: KeySpec {
                modifiers,
                key: key.to_string(),
            },
            ignored,
        })
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

fn split_keyspec(spec: &str) -> (&str, &str) {
    let search = spec.strip_suffix('-').unwrap_or(spec);
    match search.rfind('-') {
        Some(index) => (&spec[..index], &spec[index + 1..]),
        None => ("", spec),
    }
}

impl FromStr for KeySpec {
    type Err = KeySpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeySpec::parse(s).map(|parsed| parsed.spec)
    }
}

/// X style: `Control-Mod1-q`
impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}-", modifier)?;
        }
        f.write_str(&self.key)
    }
}

impl Serialize for KeySpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors that can occur while reading a keyspec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySpecError {
    #[error("keyspec cannot be empty")]
    Empty,

    #[error("keyspec has modifiers but no key")]
    MissingKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_key() {
        let spec: KeySpec = "Return".parse().unwrap();
        assert!(spec.modifiers.is_empty());
        assert_eq!(spec.key, "Return");
    }

    #[test]
    fn test_parse_splits_on_last_dash() {
        let parsed = KeySpec::parse("C-M-q").unwrap();
        assert_eq!(
            parsed.spec,
            KeySpec::new([Modifier::Control, Modifier::Mod1], "q")
        );
        assert!(parsed.ignored.is_empty());
    }

    #[test]
    fn test_parse_joined_modifiers() {
        let spec: KeySpec = "4S-Return".parse().unwrap();
        assert!(spec.has_modifier(Modifier::Mod4));
        assert!(spec.has_modifier(Modifier::Shift));
        assert_eq!(spec.key, "Return");
    }

    #[test]
    fn test_modifier_order_does_not_matter() {
        let a: KeySpec = "CM-q".parse().unwrap();
        let b: KeySpec = "MC-q".parse().unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_dash_key() {
        let spec: KeySpec = "C--".parse().unwrap();
        assert_eq!(spec, KeySpec::new([Modifier::Control], "-"));

        let spec: KeySpec = "-".parse().unwrap();
        assert_eq!(spec, KeySpec::bare("-"));
    }

    #[test]
    fn test_trailing_dash_without_key() {
        assert_eq!(KeySpec::parse("C-"), Err(KeySpecError::MissingKey));
        assert_eq!(KeySpec::parse("C-M-"), Err(KeySpecError::MissingKey));
        assert_eq!("--".parse::<KeySpec>(), Ok(KeySpec::bare("-")));
    }

    #[test]
    fn test_unknown_modifiers_are_reported() {
        let parsed = KeySpec::parse("CX-q").unwrap();
        assert_eq!(parsed.spec, KeySpec::new([Modifier::Control], "q"));
        assert_eq!(parsed.ignored, vec!['X']);
    }

    #[test]
    fn test_empty_keyspec() {
        assert_eq!(KeySpec::parse(""), Err(KeySpecError::Empty));
    }

    #[test]
    fn test_x_display() {
        let spec: KeySpec = "M4C-Tab".parse().unwrap();
        assert_eq!(spec.to_string(), "Control-Mod1-Mod4-Tab");
        assert_eq!(KeySpec::bare("F1").to_string(), "F1");
    }
}
