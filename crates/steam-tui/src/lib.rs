//! Navigation, search and rendering engine for the steam-tui library browser.
//!
//! The engine is a pure function of its inputs: a [`library::Library`], the
//! controller's [`nav::NavigationState`], and the artwork view for the
//! selected game. [`tui::ui::render`] draws those with ratatui widgets and
//! [`tui::run`] drives it from crossterm events.

pub mod artwork;
pub mod library;
pub mod nav;
pub mod rows;
pub mod search;
pub mod tui;

pub use library::{Genre, GenreTree, Library};
pub use nav::{Flow, Input, NavigationState, SearchState};
pub use rows::{FlatRow, build_flat_list};
pub use steam_api::{FamilyMember, Game};
