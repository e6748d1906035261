//! Two-pass library search: literal substring matches first, then ordered
//! subsequence matches (fzf-style) among the rest

use steam_api::Game;

/// Games matching `query`, case-insensitively.
///
/// Substring matches come first, in library order, followed by subsequence
/// matches, also in library order. The passes are disjoint. An empty query
/// matches nothing.
pub fn search<'a>(games: &'a [Game], query: &str) -> Vec<&'a Game> {
    if query.is_empty() {
        return Vec::new();
    }

    let query = query.to_lowercase();
    let names: Vec<String> = games.iter().map(|g| g.name.to_lowercase()).collect();

    let mut substring = Vec::new();
    let mut subsequence = Vec::new();
    for (game, name) in games.iter().zip(&names) {
        if name.contains(&query) {
            substring.push(game);
        } else if is_subsequence(name, &query) {
            subsequence.push(game);
        }
    }

    substring.extend(subsequence);
    substring
}

/// True if every character of `needle` occurs in `haystack` in order.
///
/// Greedy leftmost scan: each needle character consumes the first match at or
/// after the previous one, and a miss ends the attempt.
pub fn is_subsequence(haystack: &str, needle: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
