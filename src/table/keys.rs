//! Key bindings for table navigation and selection.

use crate::key::{Binding, KeyMap};
use crossterm::event::KeyCode;

/// Key bindings for the lazy table.
///
/// The defaults follow common terminal conventions: arrow keys or vim-style
/// `h`/`j`/`k`/`l` for movement, space to toggle the row under the cursor,
/// and escape to drop out of elastic selection mode.
#[derive(Debug, Clone)]
pub struct TableKeyMap {
    /// Move the cursor up one row on the visible page.
    pub cursor_up: Binding,
    /// Move the cursor down one row on the visible page.
    pub cursor_down: Binding,
    /// Navigate to the previous page (foreground fetch).
    pub prev_page: Binding,
    /// Navigate to the next page (foreground fetch).
    pub next_page: Binding,
    /// Toggle selection of the row under the cursor.
    pub toggle_row: Binding,
    /// Cancel elastic selection mode, keeping the selection itself.
    pub cancel_elastic: Binding,
}

impl Default for TableKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')])
                .with_help("↑/k")
                .with_description("up"),
            cursor_down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j")
                .with_description("down"),
            prev_page: Binding::new(vec![KeyCode::PageUp, KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h")
                .with_description("prev page"),
            next_page: Binding::new(vec![KeyCode::PageDown, KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l")
                .with_description("next page"),
            toggle_row: Binding::new(vec![KeyCode::Char(' ')])
                .with_help("space")
                .with_description("toggle row"),
            cancel_elastic: Binding::new(vec![KeyCode::Esc])
                .with_help("esc")
                .with_description("cancel elastic"),
        }
    }
}

impl KeyMap for TableKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.prev_page,
            &self.next_page,
            &self.toggle_row,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.cursor_up, &self.cursor_down],
            vec![&self.prev_page, &self.next_page],
            vec![&self.toggle_row, &self.cancel_elastic],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyMap as _;

    #[test]
    fn test_default_keymap_help() {
        let keymap = TableKeyMap::default();
        assert_eq!(keymap.short_help().len(), 5);
        assert_eq!(keymap.full_help().len(), 3);
    }
}
