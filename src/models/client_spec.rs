use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Matches windows by their `WM_CLASS` name and class for autogrouping.
///
/// Written as `name.class` or just `class`; a missing name matches any
/// window of that class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientSpec {
    pub window_name: Option<String>,
    pub window_class: String,
}

impl ClientSpec {
    pub fn new(window_name: Option<String>, window_class: impl Into<String>) -> Self {
        ClientSpec {
            window_name,
            window_class: window_class.into(),
        }
    }

    /// A spec matching every window of `window_class`
    pub fn class(window_class: impl Into<String>) -> Self {
        Self::new(None, window_class)
    }

    /// Check whether a window with the given name and class is matched
    pub fn matches(&self, name: &str, class: &str) -> bool {
        self.window_class == class
            && self
                .window_name
                .as_deref()
                .map_or(true, |expected| expected == name)
    }
}

impl FromStr for ClientSpec {
    type Err = ClientSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let spec = match parts.as_slice() {
            [class] => ClientSpec::class(*class),
            [name, class] => ClientSpec::new(Some(name.to_string()), *class),
            _ => return Err(ClientSpecError::TooManyParts(s.to_string())),
        };

        if spec.window_class.is_empty() {
            return Err(ClientSpecError::EmptyClass(s.to_string()));
        }

        Ok(spec)
    }
}

impl fmt::Display for ClientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.window_name {
            Some(name) => write!(f, "{}.{}", name, self.window_class),
            None => f.write_str(&self.window_class),
        }
    }
}

impl Serialize for ClientSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors that can occur while reading a clientspec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientSpecError {
    #[error("clientspec {0:?} has more than one '.'")]
    TooManyParts(String),

    #[error("clientspec {0:?} has an empty window class")]
    EmptyClass(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_only() {
        let spec: ClientSpec = "XTerm".parse().unwrap();
        assert_eq!(spec, ClientSpec::class("XTerm"));
        assert!(spec.matches("anything", "XTerm"));
        assert!(!spec.matches("xterm", "URxvt"));
    }

    #[test]
    fn test_name_and_class() {
        let spec: ClientSpec = "xterm.XTerm".parse().unwrap();
        assert_eq!(spec.window_name.as_deref(), Some("xterm"));
        assert_eq!(spec.window_class, "XTerm");
        assert!(spec.matches("xterm", "XTerm"));
        assert!(!spec.matches("other", "XTerm"));
        assert_eq!(spec.to_string(), "xterm.XTerm");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            "a.b.c".parse::<ClientSpec>(),
            Err(ClientSpecError::TooManyParts("a.b.c".to_string()))
        );
        assert!(matches!(
            "name.".parse::<ClientSpec>(),
            Err(ClientSpecError::EmptyClass(_))
        ));
        assert!("".parse::<ClientSpec>().is_err());
    }
}
