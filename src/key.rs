//! Key bindings with help metadata, used by the table keymap.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A single named key binding.
///
/// A binding matches one or more key codes and carries short help text so
/// components can render contextual key hints.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Key codes that trigger this binding.
    pub keys: Vec<KeyCode>,
    /// Short key label for help views (e.g. "←/h").
    pub help: String,
    /// Description of the action (e.g. "prev page").
    pub description: String,
}

impl Binding {
    /// Creates a binding for the given key codes with empty help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the key label shown in help views.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the action description shown in help views.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns true if the key message matches one of this binding's keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_lazytable::key::Binding;
    /// use bubbletea_rs::KeyMsg;
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let binding = Binding::new(vec![KeyCode::Char(' ')])
    ///     .with_help("space")
    ///     .with_description("toggle row");
    /// let msg = KeyMsg { key: KeyCode::Char(' '), modifiers: KeyModifiers::NONE };
    /// assert!(binding.matches(&msg));
    /// ```
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        self.keys.contains(&key_msg.key)
    }
}

/// Trait implemented by component keymaps to expose their bindings for help
/// rendering.
pub trait KeyMap {
    /// Bindings for the compact, single-line help view.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings for the expanded help view, grouped into columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}
