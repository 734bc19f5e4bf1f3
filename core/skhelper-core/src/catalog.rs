//! Steam catalog integration.
//!
//! - [`CatalogSearch`]: seam for the remote title → id search
//! - [`SteamStoreSearch`]: the store search endpoint over HTTP
//! - [`is_native_steam_game`]: games already wired to Steam need no injected id

use serde::Deserialize;
use std::time::Duration;

use crate::error::{HelperError, Result};
use crate::matching::SearchCandidate;
use crate::types::GameRecord;

/// Catalog id recorded when nothing could be resolved.
pub const NOT_FOUND_ID: &str = "0";

/// Library integration id of the launcher's Steam importer.
pub const STEAM_LIBRARY_PLUGIN_ID: &str = "cb91dfc9-b977-43bf-8e70-55f46e410fab";

const STORE_SEARCH_URL: &str = "https://store.steampowered.com/api/storesearch/";
const USER_AGENT: &str = concat!("skhelper/", env!("CARGO_PKG_VERSION"));

pub trait CatalogSearch {
    /// Returns candidates in catalog relevance order.
    fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;
}

#[derive(Debug, Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<StoreSearchItem>,
}

#[derive(Debug, Deserialize)]
struct StoreSearchItem {
    #[serde(rename = "type", default)]
    kind: String,
    name: String,
    id: u64,
}

#[derive(Debug, Clone)]
pub struct SteamStoreSearch {
    country: String,
    language: String,
}

impl Default for SteamStoreSearch {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            language: "english".to_string(),
        }
    }
}

impl CatalogSearch for SteamStoreSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(10))
            .timeout_write(Duration::from_secs(10))
            .build();
        let response = agent
            .get(STORE_SEARCH_URL)
            .query("term", query)
            .query("l", &self.language)
            .query("cc", &self.country)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| HelperError::Catalog(format!("store search request: {}", e)))?;

        let body = response
            .into_string()
            .map_err(|e| HelperError::io("read store search response", e))?;

        let candidates = parse_store_search(&body)?;
        tracing::debug!(query, count = candidates.len(), "Steam store search completed");
        Ok(candidates)
    }
}

fn parse_store_search(body: &str) -> Result<Vec<SearchCandidate>> {
    let parsed: StoreSearchResponse =
        serde_json::from_str(body).map_err(|e| HelperError::Json {
            context: "decode store search response".to_string(),
            source: e,
        })?;

    Ok(parsed
        .items
        .into_iter()
        .filter(|item| item.kind.is_empty() || item.kind == "app")
        .map(|item| SearchCandidate::new(item.name, item.id.to_string()))
        .collect())
}

/// True when the launcher already starts the game through Steam, which
/// provides the app id itself.
pub fn is_native_steam_game(game: &GameRecord) -> bool {
    if game
        .source_plugin_id
        .as_deref()
        .is_some_and(|id| id.eq_ignore_ascii_case(STEAM_LIBRARY_PLUGIN_ID))
    {
        return true;
    }

    game.game_actions.iter().any(|action| {
        action
            .path
            .as_deref()
            .is_some_and(|path| path.trim_start().to_ascii_lowercase().starts_with("steam://"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LaunchAction;

    #[test]
    fn test_parse_store_search_normalizes_names() {
        let body = r#"{
            "total": 3,
            "items": [
                {"type": "app", "name": "Portal 2", "id": 620, "tiny_image": "x"},
                {"type": "app", "name": "The Witcher® 3: Wild Hunt", "id": 292030},
                {"type": "sub", "name": "Portal Bundle", "id": 7932}
            ]
        }"#;
        let candidates = parse_store_search(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].catalog_id, "620");
        assert_eq!(candidates[1].raw_name, "The Witcher® 3: Wild Hunt");
        assert_eq!(candidates[1].normalized_name, "The Witcher 3: Wild Hunt");
    }

    #[test]
    fn test_parse_store_search_empty_and_invalid() {
        assert!(parse_store_search(r#"{"total": 0}"#).unwrap().is_empty());
        assert!(matches!(
            parse_store_search("<html>"),
            Err(HelperError::Json { .. })
        ));
    }

    #[test]
    fn test_native_steam_game_by_plugin() {
        let game = GameRecord {
            source_plugin_id: Some(STEAM_LIBRARY_PLUGIN_ID.to_uppercase()),
            ..Default::default()
        };
        assert!(is_native_steam_game(&game));
    }

    #[test]
    fn test_native_steam_game_by_action_url() {
        let mut game = GameRecord {
            game_actions: vec![LaunchAction {
                path: Some("steam://rungameid/620".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(is_native_steam_game(&game));

        game.game_actions[0].path = Some(r"C:\Games\Portal 2\portal2.exe".to_string());
        assert!(!is_native_steam_game(&game));
    }
}
