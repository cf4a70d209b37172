use serde::Serialize;
use std::collections::HashMap;

use super::client_spec::ClientSpec;
use super::color::Rgb;
use super::keyspec::KeySpec;

/// Space reserved at each screen edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Gap {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Gap {
            top,
            bottom,
            left,
            right,
        }
    }
}

/// Window manager settings produced by parsing a configuration file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Window border width in pixels
    pub border_width: i32,
    /// Distance at which windows snap to screen edges
    pub snap_distance: i32,
    /// Named colour slots such as `activeborder`
    pub colors: HashMap<String, Rgb>,
    /// Screen edge margins
    pub gap: Gap,
    /// Group each matching client is placed in on creation
    pub autogroups: HashMap<ClientSpec, i32>,
    /// Key bindings; a missing key is unbound
    pub binds: HashMap<KeySpec, String>,
    /// Shell command aliases for the application menu
    pub commands: HashMap<String, String>,
    pub font: String,
    /// Windows to leave undecorated, in declaration order
    pub ignores: Vec<String>,
    /// Mouse bindings, keyed by the command they trigger
    pub mouse_binds: HashMap<String, KeySpec>,
    /// Pixels moved per keyboard move/resize step
    pub move_amount: i32,
    /// Whether new windows are sticky across groups
    pub sticky: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            border_width: 0,
            snap_distance: 0,
            colors: HashMap::new(),
            gap: Gap::default(),
            autogroups: HashMap::new(),
            binds: HashMap::new(),
            commands: HashMap::new(),
            font: String::new(),
            ignores: Vec::new(),
            mouse_binds: HashMap::new(),
            move_amount: 1,
            sticky: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command bound to a key, if any
    pub fn binding(&self, key: &KeySpec) -> Option<&str> {
        self.binds.get(key).map(String::as_str)
    }

    /// Keyspec that triggers a mouse command, if any
    pub fn mouse_binding(&self, command: &str) -> Option<&KeySpec> {
        self.mouse_binds.get(command)
    }

    pub fn autogroup(&self, client: &ClientSpec) -> Option<i32> {
        self.autogroups.get(client).copied()
    }

    pub fn color(&self, slot: &str) -> Option<Rgb> {
        self.colors.get(slot).copied()
    }

    /// Group for a window, preferring a name-and-class match over a class-only one
    pub fn group_for_window(&self, name: &str, class: &str) -> Option<i32> {
        let exact = ClientSpec::new(Some(name.to_string()), class);
        self.autogroup(&exact)
            .or_else(|| self.autogroup(&ClientSpec::class(class)))
    }
}
