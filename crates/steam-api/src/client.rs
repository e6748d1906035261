//! Blocking HTTP client for the Steam Web API and store API

use crate::models::{FamilyMember, Game};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// GetPlayerSummaries accepts at most this many ids per request
const SUMMARY_BATCH_SIZE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// True for 401/403, which the family endpoint returns for keys without access
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status {
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            }
        )
    }
}

/// Split a comma-separated list of SteamIDs, dropping blanks
pub fn parse_family_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct Envelope<T: Default> {
    #[serde(default)]
    response: T,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u32,
    name: Option<String>,
    #[serde(default)]
    playtime_forever: u64,
}

#[derive(Debug, Default, Deserialize)]
struct FamilyGroupResponse {
    family_group: Option<FamilyGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct FamilyGroup {
    #[serde(default)]
    members: Vec<FamilyGroupMember>,
}

#[derive(Debug, Deserialize)]
struct FamilyGroupMember {
    /// Sometimes a string, sometimes a bare number
    steamid: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerSummariesResponse {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummary {
    steamid: String,
    personaname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppDetails {
    #[serde(default)]
    success: bool,
    data: Option<AppDetailsData>,
}

#[derive(Debug, Deserialize)]
struct AppDetailsData {
    #[serde(default)]
    genres: Vec<AppGenre>,
}

#[derive(Debug, Deserialize)]
struct AppGenre {
    description: String,
}

fn steam_id_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct SteamClient {
    http: Client,
    api_key: String,
    steam_id: String,
    api_base: String,
    store_base: String,
}

impl SteamClient {
    pub fn new(api_key: impl Into<String>, steam_id: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("steam-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ApiError::Http {
                endpoint: "client",
                source,
            })?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            steam_id: steam_id.into(),
            api_base: crate::get_api_base_url(),
            store_base: crate::get_store_base_url(),
        })
    }

    /// SteamID of the primary user
    pub fn steam_id(&self) -> &str {
        &self.steam_id
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|source| ApiError::Http { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status });
        }

        let body = response
            .text()
            .map_err(|source| ApiError::Http { endpoint, source })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }

    /// Games owned by `steam_id`. Genres are left empty; see [`Self::fetch_app_genres`].
    pub fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<Game>, ApiError> {
        let url = format!("{}/IPlayerService/GetOwnedGames/v1/", self.api_base);
        let envelope: Envelope<OwnedGamesResponse> = self.get_json(
            "GetOwnedGames",
            &url,
            &[
                ("key", self.api_key.as_str()),
                ("steamid", steam_id),
                ("include_appinfo", "1"),
                ("include_played_free_games", "1"),
                ("format", "json"),
            ],
        )?;

        Ok(envelope
            .response
            .games
            .into_iter()
            .map(|g| {
                Game::new(
                    g.appid,
                    g.name.unwrap_or_else(|| "Unknown".to_string()),
                    Vec::new(),
                    g.playtime_forever,
                )
            })
            .collect())
    }

    /// SteamIDs of the other family group members.
    ///
    /// Falls back to `fallback` when the key is not authorized for the family
    /// endpoint, the request fails, or the group comes back empty.
    pub fn fetch_family_member_ids(&self, fallback: &[String]) -> Vec<String> {
        let url = format!(
            "{}/IFamilyGroupsService/GetFamilyGroupForUser/v1/",
            self.api_base
        );
        let result: Result<Envelope<FamilyGroupResponse>, ApiError> = self.get_json(
            "GetFamilyGroupForUser",
            &url,
            &[
                ("key", self.api_key.as_str()),
                ("steamid", self.steam_id.as_str()),
                ("format", "json"),
            ],
        );

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) if e.is_unauthorized() => {
                debug!("Family endpoint not authorized, using configured ids: {e}");
                return fallback.to_vec();
            }
            Err(e) => {
                warn!("Failed to fetch family group: {e}");
                return fallback.to_vec();
            }
        };

        let ids = family_ids_from(envelope.response, &self.steam_id);
        if ids.is_empty() {
            debug!("Family group is empty, using configured ids");
            fallback.to_vec()
        } else {
            ids
        }
    }

    /// Persona names keyed by SteamID. Failed batches are skipped.
    pub fn fetch_player_summaries(&self, steam_ids: &[String]) -> HashMap<String, String> {
        let url = format!("{}/ISteamUser/GetPlayerSummaries/v2/", self.api_base);
        let mut names = HashMap::new();

        for batch in steam_ids.chunks(SUMMARY_BATCH_SIZE) {
            let joined = batch.join(",");
            let result: Result<Envelope<PlayerSummariesResponse>, ApiError> = self.get_json(
                "GetPlayerSummaries",
                &url,
                &[
                    ("key", self.api_key.as_str()),
                    ("steamids", joined.as_str()),
                    ("format", "json"),
                ],
            );

            match result {
                Ok(envelope) => {
                    for player in envelope.response.players {
                        if let Some(name) = player.personaname {
                            names.insert(player.steamid, name);
                        }
                    }
                }
                Err(e) => warn!("Failed to fetch player summaries: {e}"),
            }
        }

        names
    }

    /// Family member with their owned app ids; a private library yields an empty set
    pub fn build_family_member(&self, steam_id: &str, persona_name: &str) -> FamilyMember {
        let owned = match self.fetch_owned_games(steam_id) {
            Ok(games) => games.into_iter().map(|g| g.appid).collect(),
            Err(e) => {
                debug!("Library for {steam_id} unavailable: {e}");
                Vec::new()
            }
        };
        FamilyMember::new(steam_id, persona_name, owned)
    }

    /// Store genres for an app, in store order. Empty on any failure.
    pub fn fetch_app_genres(&self, appid: u32) -> Vec<String> {
        let url = format!("{}/api/appdetails", self.store_base);
        let appid_str = appid.to_string();
        let result: Result<HashMap<String, AppDetails>, ApiError> = self.get_json(
            "appdetails",
            &url,
            &[("appids", appid_str.as_str()), ("filters", "genres")],
        );

        match result {
            Ok(mut details) => details
                .remove(&appid_str)
                .filter(|d| d.success)
                .and_then(|d| d.data)
                .map(|data| data.genres.into_iter().map(|g| g.description).collect())
                .unwrap_or_default(),
            Err(e) => {
                debug!("No genres for {appid}: {e}");
                Vec::new()
            }
        }
    }
}

fn family_ids_from(response: FamilyGroupResponse, own_id: &str) -> Vec<String> {
    response
        .family_group
        .map(|group| group.members)
        .unwrap_or_default()
        .iter()
        .map(|m| steam_id_string(&m.steamid))
        .filter(|id| id != own_id)
        .collect()
}
