//! Navigation controller: cursor, expanded genres, and search mode

use crate::library::Library;
use crate::rows::{FlatRow, build_flat_list};
use crate::search::search;
use std::collections::HashSet;
use steam_api::Game;

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Delete,
    Char(char),
    /// Ctrl+C
    Interrupt,
}

/// Whether the event loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Query and results while search mode is active
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Game>,
}

/// All mutable UI state, owned by the controller and changed only through
/// [`NavigationState::handle`].
///
/// `cursor` indexes the active list: the flat tree rows in browse mode, the
/// search results in search mode. It is kept within
/// `[0, max(0, len - 1)]` of whichever list is active.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    cursor: usize,
    expanded: HashSet<String>,
    search: Option<SearchState>,
    selected: Option<Game>,
}

enum OpenAction {
    Expand(String),
    Select(Game),
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// `Some` in search mode, even when the query is still empty
    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Game shown in the detail pane; survives mode switches
    pub fn selected(&self) -> Option<&Game> {
        self.selected.as_ref()
    }

    /// Apply one input event
    pub fn handle(&mut self, library: &Library, input: Input) -> Flow {
        if input == Input::Interrupt {
            return Flow::Quit;
        }
        if self.search.is_some() {
            self.handle_search(library, input);
            Flow::Continue
        } else {
            self.handle_browse(library, input)
        }
    }

    fn handle_browse(&mut self, library: &Library, input: Input) -> Flow {
        // Rows are rebuilt on every event so the cursor is never read against a stale list
        let rows = build_flat_list(&library.tree, &self.expanded);

        match input {
            Input::Up | Input::Char('k') => self.move_cursor(-1, rows.len()),
            Input::Down | Input::Char('j') => self.move_cursor(1, rows.len()),
            Input::Right | Input::Enter | Input::Char('l') => self.open(&rows),
            Input::Left | Input::Char('h') => self.close(library, &rows),
            Input::Char('/') => self.enter_search(),
            Input::Char('q') => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn handle_search(&mut self, library: &Library, input: Input) {
        let Some(search_state) = self.search.as_mut() else {
            return;
        };

        match input {
            Input::Esc => self.exit_search(),
            Input::Backspace | Input::Delete => {
                search_state.query.pop();
                self.update_results(library);
            }
            Input::Enter => {
                if let Some(game) = search_state.results.get(self.cursor).cloned() {
                    self.selected = Some(game);
                    self.exit_search();
                }
            }
            Input::Up => {
                let len = search_state.results.len();
                self.move_cursor(-1, len);
            }
            Input::Down => {
                let len = search_state.results.len();
                self.move_cursor(1, len);
            }
            Input::Char(c) if !c.is_control() => {
                search_state.query.push(c);
                self.update_results(library);
            }
            _ => {}
        }
    }

    /// Shift by `delta`, clamped to `[0, max(0, len - 1)]`; never wraps
    fn move_cursor(&mut self, delta: isize, len: usize) {
        let max = len.saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    fn open(&mut self, rows: &[FlatRow<'_>]) {
        let action = match rows.get(self.cursor) {
            Some(FlatRow::GenreHeader { genre, .. }) => OpenAction::Expand(genre.to_string()),
            Some(FlatRow::GameRow { game, .. }) => OpenAction::Select((*game).clone()),
            None => return,
        };

        match action {
            // The list grows below the header; the cursor stays on it
            OpenAction::Expand(genre) => {
                self.expanded.insert(genre);
            }
            OpenAction::Select(game) => self.selected = Some(game),
        }
    }

    fn close(&mut self, library: &Library, rows: &[FlatRow<'_>]) {
        let Some(row) = rows.get(self.cursor) else {
            return;
        };
        if !self.expanded.remove(row.genre()) {
            return;
        }

        // The index is kept and only clamped to the shorter list
        let len = build_flat_list(&library.tree, &self.expanded).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn enter_search(&mut self) {
        self.search = Some(SearchState::default());
        self.cursor = 0;
    }

    fn exit_search(&mut self) {
        self.search = None;
        self.cursor = 0;
    }

    fn update_results(&mut self, library: &Library) {
        if let Some(state) = self.search.as_mut() {
            state.results = search(&library.games, &state.query)
                .into_iter()
                .cloned()
                .collect();
        }
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steam_api::FamilyMember;

    fn library() -> Library {
        Library::new(
            vec![
                Game::new(10, "Half-Life", vec!["Action".into()], 0),
                Game::new(30, "Doom", vec!["Action".into()], 0),
                Game::new(20, "Portal", vec!["Puzzle".into()], 0),
            ],
            vec![FamilyMember::new("1", "me", [10, 20, 30])],
        )
    }

    fn press(state: &mut NavigationState, library: &Library, inputs: &[Input]) {
        for input in inputs {
            assert_eq!(state.handle(library, *input), Flow::Continue);
        }
    }

    fn type_text(state: &mut NavigationState, library: &Library, text: &str) {
        for c in text.chars() {
            state.handle(library, Input::Char(c));
        }
    }

    #[test]
    fn test_cursor_clamps_instead_of_wrapping() {
        let lib = library();
        let mut state = NavigationState::new();

        press(&mut state, &lib, &[Input::Up]);
        assert_eq!(state.cursor(), 0);

        press(&mut state, &lib, &[Input::Down, Input::Down, Input::Down]);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_expand_keeps_cursor_and_grows_list() {
        let lib = library();
        let mut state = NavigationState::new();

        press(&mut state, &lib, &[Input::Enter]);
        assert!(state.expanded().contains("Action"));
        assert_eq!(state.cursor(), 0);

        // Action (2 games) now open: header, Doom, Half-Life, Puzzle
        press(&mut state, &lib, &[Input::Down; 5]);
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_expand_is_idempotent() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Right, Input::Char('l')]);
        assert_eq!(state.expanded().len(), 1);
    }

    #[test]
    fn test_open_game_row_selects_it() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Enter, Input::Char('j'), Input::Enter]);
        assert_eq!(state.selected().map(|g| g.appid), Some(30));
    }

    #[test]
    fn test_collapse_from_game_row_keeps_index() {
        let lib = library();
        let mut state = NavigationState::new();
        // Action, Doom, Half-Life, Puzzle: collapse from Doom
        press(&mut state, &lib, &[Input::Enter, Input::Down, Input::Char('h')]);
        assert!(state.expanded().is_empty());
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_collapse_from_last_game_row_clamps() {
        let lib = library();
        let mut state = NavigationState::new();
        // From Half-Life at index 2; only Action and Puzzle remain
        press(
            &mut state,
            &lib,
            &[Input::Enter, Input::Down, Input::Down, Input::Char('h')],
        );
        assert!(state.expanded().is_empty());
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_collapse_keeps_cursor_in_range() {
        let lib = library();
        let mut state = NavigationState::new();
        // Open both genres, park on the last Puzzle game, collapse Puzzle
        press(&mut state, &lib, &[Input::Enter, Input::Down, Input::Down, Input::Down]);
        press(&mut state, &lib, &[Input::Enter, Input::Down, Input::Left]);
        assert_eq!(state.cursor(), 3);
        assert!(!state.expanded().contains("Puzzle"));
        assert!(state.expanded().contains("Action"));
    }

    #[test]
    fn test_collapse_on_closed_header_is_noop() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Down, Input::Left]);
        assert_eq!(state.cursor(), 1);
        assert!(state.expanded().is_empty());
    }

    #[test]
    fn test_enter_search_resets_cursor() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Down, Input::Char('/')]);

        let search = state.search().unwrap();
        assert!(search.query.is_empty());
        assert!(search.results.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_typing_filters_and_resets_cursor() {
        let lib = library();
        let mut state = NavigationState::new();
        state.handle(&lib, Input::Char('/'));
        type_text(&mut state, &lib, "o");
        assert_eq!(state.search().unwrap().results.len(), 2);

        state.handle(&lib, Input::Down);
        assert_eq!(state.cursor(), 1);

        type_text(&mut state, &lib, "r");
        assert_eq!(state.cursor(), 0);
        let names: Vec<&str> = state
            .search()
            .unwrap()
            .results
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Portal"]);
    }

    #[test]
    fn test_search_mode_treats_browse_keys_as_text() {
        let lib = library();
        let mut state = NavigationState::new();
        state.handle(&lib, Input::Char('/'));
        assert_eq!(state.handle(&lib, Input::Char('q')), Flow::Continue);
        type_text(&mut state, &lib, "jk");
        assert_eq!(state.search().unwrap().query, "qjk");
    }

    #[test]
    fn test_backspace_on_empty_query_is_noop() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Char('/'), Input::Backspace, Input::Delete]);
        assert_eq!(state.search().unwrap().query, "");

        type_text(&mut state, &lib, "hl");
        state.handle(&lib, Input::Backspace);
        assert_eq!(state.search().unwrap().query, "h");
        assert_eq!(state.search().unwrap().results.len(), 1);

        state.handle(&lib, Input::Backspace);
        assert!(state.search().unwrap().results.is_empty());
    }

    #[test]
    fn test_confirm_selects_and_returns_to_browse() {
        let lib = library();
        let mut state = NavigationState::new();
        state.handle(&lib, Input::Char('/'));
        type_text(&mut state, &lib, "hlf");
        state.handle(&lib, Input::Enter);

        assert!(!state.is_searching());
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selected().map(|g| g.name.as_str()), Some("Half-Life"));
    }

    #[test]
    fn test_confirm_with_no_results_stays_in_search() {
        let lib = library();
        let mut state = NavigationState::new();
        state.handle(&lib, Input::Char('/'));
        type_text(&mut state, &lib, "zzz");
        state.handle(&lib, Input::Enter);
        assert!(state.is_searching());
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_escape_keeps_selection() {
        let lib = library();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Enter, Input::Down, Input::Enter]);
        let selected = state.selected().cloned();

        state.handle(&lib, Input::Char('/'));
        type_text(&mut state, &lib, "por");
        state.handle(&lib, Input::Esc);

        assert!(!state.is_searching());
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selected().cloned(), selected);
    }

    #[test]
    fn test_search_cursor_clamps_on_results() {
        let lib = library();
        let mut state = NavigationState::new();
        state.handle(&lib, Input::Char('/'));
        press(&mut state, &lib, &[Input::Down, Input::Up, Input::Up]);
        assert_eq!(state.cursor(), 0);

        type_text(&mut state, &lib, "o");
        press(&mut state, &lib, &[Input::Down; 4]);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let lib = library();
        let mut state = NavigationState::new();
        assert_eq!(state.handle(&lib, Input::Char('q')), Flow::Quit);

        state.handle(&lib, Input::Char('/'));
        assert_eq!(state.handle(&lib, Input::Interrupt), Flow::Quit);
    }

    #[test]
    fn test_empty_library() {
        let lib = Library::default();
        let mut state = NavigationState::new();
        press(&mut state, &lib, &[Input::Down, Input::Enter, Input::Left, Input::Up]);
        assert_eq!(state.cursor(), 0);
        assert!(state.selected().is_none());
    }
}
