//! Steam Web API client and the library models shared with the TUI.
//!
//! Everything here is best-effort: a failing endpoint degrades to an empty or
//! fallback value and is logged, because the UI has nowhere to show errors.

mod client;
mod load;
mod models;

pub use client::{ApiError, SteamClient, parse_family_ids};
pub use load::{LibraryData, LoadOptions};
pub use models::{FamilyMember, Game, UNCATEGORIZED};

fn get_api_base_url() -> String {
    std::env::var("STEAM_API_URL").unwrap_or_else(|_| "https://api.steampowered.com".to_string())
}

fn get_store_base_url() -> String {
    std::env::var("STEAM_STORE_URL")
        .unwrap_or_else(|_| "https://store.steampowered.com".to_string())
}
