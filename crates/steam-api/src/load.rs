//! One-shot library load: owned games, family group, persona names

use crate::client::SteamClient;
use crate::models::{FamilyMember, Game};
use log::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Used when the family endpoint is unauthorized or empty
    pub fallback_family_ids: Vec<String>,
    /// Query the store API for each game's genres (one request per game)
    pub enrich_genres: bool,
}

/// Everything the browser needs, fetched once before the UI starts
#[derive(Debug, Clone, Default)]
pub struct LibraryData {
    pub games: Vec<Game>,
    /// All members including the primary user, primary user first
    pub family: Vec<FamilyMember>,
}

impl SteamClient {
    /// Load the library, reporting each step through `progress`.
    ///
    /// Upstream failures degrade to empty data; this never fails.
    pub fn load_library(
        &self,
        options: &LoadOptions,
        mut progress: impl FnMut(&str),
    ) -> LibraryData {
        progress("Fetching your game library…");
        let mut games = match self.fetch_owned_games(self.steam_id()) {
            Ok(games) => games,
            Err(e) => {
                warn!("Failed to fetch owned games: {e}");
                Vec::new()
            }
        };
        info!("Loaded {} owned games", games.len());

        if options.enrich_genres {
            let total = games.len();
            for (i, game) in games.iter_mut().enumerate() {
                progress(&format!("Fetching genres ({}/{total})…", i + 1));
                game.genres = self.fetch_app_genres(game.appid);
            }
        }

        progress("Fetching family group…");
        let member_ids = self.fetch_family_member_ids(&options.fallback_family_ids);
        let all_ids = member_ids_with_self(self.steam_id(), member_ids);

        progress("Fetching player names…");
        let names = self.fetch_player_summaries(&all_ids);

        let family = all_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let persona = names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| format!("Member {}", idx + 1));
                progress(&format!("Fetching library for {persona}…"));
                self.build_family_member(id, &persona)
            })
            .collect();

        LibraryData { games, family }
    }
}

/// `[own_id] + others`, deduplicated with first occurrence kept
fn member_ids_with_self(own_id: &str, others: Vec<String>) -> Vec<String> {
    let mut ids = vec![own_id.to_string()];
    for id in others {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
