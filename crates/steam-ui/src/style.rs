/// Glyphs used across the panes. All of them are one column wide.
pub mod icons {
    pub const EXPANDED: &str = "▼";
    pub const COLLAPSED: &str = "▶";
    pub const BRANCH: &str = "├";
    pub const CURSOR_MARKER: &str = "◀";
    pub const OWNED: &str = "✓";
    pub const NOT_OWNED: &str = "✗";
    pub const INPUT_CURSOR: &str = "|";
}

/// Disable colour output when `NO_COLOR` is set
pub fn init_color() {
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
}

/// Whether foreground colours should be used, after `init_color`
pub fn colors_enabled() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}
