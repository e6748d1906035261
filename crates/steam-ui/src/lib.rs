//! # steam-ui
//!
//! Terminal text primitives for the steam-tui panes: glyphs, colour
//! switches and column-aware truncation of pane text.
//!
//! ## Example
//!
//! ```rust
//! use steam_ui::{display_width, pad_text, truncate_text};
//!
//! let name = truncate_text("Half-Life 2: Episode Two", 12);
//! assert_eq!(name, "Half-Life 2…");
//! assert_eq!(display_width(&pad_text("Portal", 12)), 12);
//! ```

mod style;
mod terminal;

pub use style::{colors_enabled, icons, init_color};
pub use terminal::{ELLIPSIS, display_width, fit_width, pad_text, truncate_text};

// Re-export commonly used items from dependencies
pub use colored::Colorize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Colorize, display_width, icons, pad_text, truncate_text};
}
