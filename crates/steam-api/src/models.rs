use std::collections::HashSet;

/// Genre assigned to games that carry no genre information.
pub const UNCATEGORIZED: &str = "Uncategorized";

const CDN_BASE: &str = "https://cdn.cloudflare.steamstatic.com/steam/apps";

/// A game in the user's library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub appid: u32,
    pub name: String,
    pub genres: Vec<String>,
    /// Total playtime in minutes (`playtime_forever` upstream)
    pub playtime_minutes: u64,
}

impl Game {
    pub fn new(
        appid: u32,
        name: impl Into<String>,
        genres: Vec<String>,
        playtime_minutes: u64,
    ) -> Self {
        Self {
            appid,
            name: name.into(),
            genres,
            playtime_minutes,
        }
    }

    pub fn primary_genre(&self) -> &str {
        self.genres.first().map(String::as_str).unwrap_or(UNCATEGORIZED)
    }

    pub fn playtime_display(&self) -> String {
        let hours = self.playtime_minutes / 60;
        let minutes = self.playtime_minutes % 60;
        match (hours, minutes) {
            (0, 0) => "Never played".to_string(),
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }

    /// Portrait library capsule
    pub fn artwork_url(&self) -> String {
        format!("{CDN_BASE}/{}/library_600x900.jpg", self.appid)
    }

    /// Landscape store header, present for nearly every app
    pub fn header_url(&self) -> String {
        format!("{CDN_BASE}/{}/header.jpg", self.appid)
    }
}

/// A member of the user's Steam family group (the user included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMember {
    pub steam_id: String,
    pub persona_name: String,
    pub owned_app_ids: HashSet<u32>,
}

impl FamilyMember {
    pub fn new(
        steam_id: impl Into<String>,
        persona_name: impl Into<String>,
        owned_app_ids: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            steam_id: steam_id.into(),
            persona_name: persona_name.into(),
            owned_app_ids: owned_app_ids.into_iter().collect(),
        }
    }

    pub fn owns(&self, appid: u32) -> bool {
        self.owned_app_ids.contains(&appid)
    }
}
