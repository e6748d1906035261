//! Flattening the genre tree into cursor-addressable rows

use crate::library::GenreTree;
use std::collections::HashSet;
use steam_api::Game;

/// A navigable row in browse mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatRow<'a> {
    GenreHeader {
        genre: &'a str,
        game_count: usize,
        expanded: bool,
    },
    GameRow {
        game: &'a Game,
        genre: &'a str,
    },
}

impl<'a> FlatRow<'a> {
    /// The header's own genre, or the parent genre of a game row
    pub fn genre(&self) -> &'a str {
        match *self {
            FlatRow::GenreHeader { genre, .. } | FlatRow::GameRow { genre, .. } => genre,
        }
    }
}

/// Project the tree onto rows: every genre header in tree order, each
/// expanded genre followed by its games in stored order.
///
/// This is the only mapping from cursor index to entity; rebuild it after
/// any change to `expanded` instead of keeping an old copy around.
pub fn build_flat_list<'a>(tree: &'a GenreTree, expanded: &HashSet<String>) -> Vec<FlatRow<'a>> {
    let mut rows = Vec::with_capacity(tree.len());
    for genre in tree.genres() {
        let is_expanded = expanded.contains(&genre.name);
        rows.push(FlatRow::GenreHeader {
            genre: &genre.name,
            game_count: genre.games.len(),
            expanded: is_expanded,
        });
        if is_expanded {
            rows.extend(genre.games.iter().map(|game| FlatRow::GameRow {
                game,
                genre: &genre.name,
            }));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> GenreTree {
        GenreTree::build(&[
            Game::new(10, "Half-Life", vec!["Action".into()], 0),
            Game::new(30, "Doom", vec!["Action".into()], 0),
            Game::new(20, "Portal", vec!["Puzzle".into()], 0),
        ])
    }

    fn expanded(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_collapsed_tree_shows_headers_only() {
        let tree = tree();
        let rows = build_flat_list(&tree, &HashSet::new());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            FlatRow::GenreHeader {
                genre: "Action",
                game_count: 2,
                expanded: false
            }
        );
    }

    #[test]
    fn test_expanded_genre_lists_games_after_header() {
        let tree = tree();
        let rows = build_flat_list(&tree, &expanded(&["Action"]));
        assert_eq!(rows.len(), 4);

        let names: Vec<&str> = rows
            .iter()
            .filter_map(|r| match r {
                FlatRow::GameRow { game, .. } => Some(game.name.as_str()),
                FlatRow::GenreHeader { .. } => None,
            })
            .collect();
        assert_eq!(names, vec!["Doom", "Half-Life"]);
        assert_eq!(rows[1].genre(), "Action");
        assert_eq!(rows[3].genre(), "Puzzle");
    }

    #[test]
    fn test_length_is_headers_plus_expanded_games() {
        let tree = tree();
        for open in [vec![], vec!["Action"], vec!["Puzzle"], vec!["Action", "Puzzle"]] {
            let set = expanded(&open);
            let expected = tree.len()
                + open
                    .iter()
                    .map(|g| tree.get(g).unwrap().games.len())
                    .sum::<usize>();
            assert_eq!(build_flat_list(&tree, &set).len(), expected);
        }
    }

    #[test]
    fn test_unknown_expanded_names_are_ignored() {
        let tree = tree();
        let rows = build_flat_list(&tree, &expanded(&["Racing"]));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_collapse_and_reexpand_is_identical() {
        let tree = tree();
        let before: Vec<_> = build_flat_list(&tree, &expanded(&["Action"]));
        let collapsed = build_flat_list(&tree, &HashSet::new());
        let after = build_flat_list(&tree, &expanded(&["Action"]));
        assert_ne!(before, collapsed);
        assert_eq!(before, after);
    }
}
