//! Styling for the lazy table's rendered output.
//!
//! All default styles use `AdaptiveColor` so output stays readable in both
//! light and dark terminal themes.

use lipgloss_extras::prelude::*;

/// Marker rendered in front of a selected row.
pub const CHECKED: &str = "[x]";

/// Marker rendered in front of an unselected row.
pub const UNCHECKED: &str = "[ ]";

/// Unicode bullet character (•) used as the status bar divider.
pub const BULLET: &str = "•";

/// Styles for every visual element of the table view.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazytable::table::TableStyles;
/// use lipgloss_extras::prelude::*;
///
/// let mut styles = TableStyles::default();
/// styles.banner = Style::new().foreground(Color::from("205")).bold(true);
/// ```
#[derive(Debug, Clone)]
pub struct TableStyles {
    /// Style for an unselected row.
    pub row: Style,
    /// Style for a selected row.
    pub selected_row: Style,
    /// Style for the row under the cursor.
    pub cursor_row: Style,
    /// Style for the status bar line.
    pub status_bar: Style,
    /// Style for the elastic-mode banner.
    pub banner: Style,
    /// Style for the placeholder shown while loading or when the listing is
    /// empty.
    pub placeholder: Style,
}

impl Default for TableStyles {
    fn default() -> Self {
        let subdued_color = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            row: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            selected_row: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            cursor_row: Style::new().bold(true),
            status_bar: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            banner: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#1976d2",
                    Dark: "#64b5f6",
                })
                .bold(true),
            placeholder: Style::new().foreground(subdued_color),
        }
    }
}
