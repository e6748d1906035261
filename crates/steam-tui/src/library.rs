//! Genre index over the loaded library

use std::collections::HashMap;
use steam_api::{FamilyMember, Game, LibraryData};

/// One genre and its games, sorted by case-insensitive name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    pub games: Vec<Game>,
}

/// Two-level index: genres sorted case-insensitively, each holding its games.
///
/// Every game appears exactly once, under its primary genre. Sorts are stable,
/// so names that compare equal keep the order they had in the library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTree {
    genres: Vec<Genre>,
}

impl GenreTree {
    pub fn build(games: &[Game]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut genres: Vec<Genre> = Vec::new();

        for game in games {
            let genre = game.primary_genre();
            let slot = *index.entry(genre).or_insert_with(|| {
                genres.push(Genre {
                    name: genre.to_string(),
                    games: Vec::new(),
                });
                genres.len() - 1
            });
            genres[slot].games.push(game.clone());
        }

        for genre in &mut genres {
            genre.games.sort_by_cached_key(|g| g.name.to_lowercase());
        }
        genres.sort_by_cached_key(|g| g.name.to_lowercase());

        Self { genres }
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn get(&self, name: &str) -> Option<&Genre> {
        self.genres.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

/// Loaded library data plus its genre index. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub games: Vec<Game>,
    pub tree: GenreTree,
    pub family: Vec<FamilyMember>,
}

impl Library {
    pub fn new(games: Vec<Game>, family: Vec<FamilyMember>) -> Self {
        let tree = GenreTree::build(&games);
        Self {
            games,
            tree,
            family,
        }
    }
}

impl From<LibraryData> for Library {
    fn from(data: LibraryData) -> Self {
        Self::new(data.games, data.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(appid: u32, name: &str, genres: &[&str]) -> Game {
        Game::new(
            appid,
            name,
            genres.iter().map(|g| g.to_string()).collect(),
            0,
        )
    }

    #[test]
    fn test_genres_sorted_case_insensitively() {
        let tree = GenreTree::build(&[
            game(1, "Doom", &["shooter"]),
            game(2, "Portal", &["Puzzle"]),
            game(3, "Celeste", &["Action", "Platformer"]),
        ]);
        let names: Vec<&str> = tree.genres().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Puzzle", "shooter"]);
    }

    #[test]
    fn test_games_sorted_case_insensitively() {
        let tree = GenreTree::build(&[
            game(1, "portal 2", &["Puzzle"]),
            game(2, "Baba Is You", &["Puzzle"]),
            game(3, "Portal", &["Puzzle"]),
        ]);
        let names: Vec<&str> = tree.genres()[0]
            .games
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Baba Is You", "Portal", "portal 2"]);
    }

    #[test]
    fn test_every_game_appears_once_under_primary_genre() {
        let games = vec![
            game(1, "Half-Life", &["Action", "Shooter"]),
            game(2, "Stardew Valley", &[]),
            game(3, "Hades", &["Action"]),
            game(4, "Terraria", &[]),
        ];
        let tree = GenreTree::build(&games);

        let total: usize = tree.genres().iter().map(|g| g.games.len()).sum();
        assert_eq!(total, games.len());

        for g in &games {
            let genre = tree.get(g.primary_genre()).unwrap();
            assert_eq!(genre.games.iter().filter(|x| x.appid == g.appid).count(), 1);
        }
        assert_eq!(tree.get("Uncategorized").unwrap().games.len(), 2);
        assert!(tree.get("Shooter").is_none());
    }

    #[test]
    fn test_empty_library() {
        let tree = GenreTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }
}
