//! One-off title lookup, for checking what a game would be matched to.

use serde::Serialize;
use skhelper_core::{
    normalize_game_name, CatalogSearch, IdentityMatcher, MatchOptions, MatchResult,
    SteamStoreSearch,
};
use std::io::{self, Write};

use crate::error::HookError;

#[derive(Debug, Serialize)]
struct Resolution {
    title: String,
    query: String,
    candidates: usize,
    #[serde(flatten)]
    result: MatchResult,
}

pub fn run(title: &str, background: bool) -> Result<(), HookError> {
    let resolution = resolve_with(&SteamStoreSearch::default(), title, background)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &resolution).map_err(HookError::Output)?;
    let _ = writeln!(stdout);
    Ok(())
}

fn resolve_with(
    catalog: &dyn CatalogSearch,
    title: &str,
    background: bool,
) -> Result<Resolution, HookError> {
    let query = normalize_game_name(title);
    let candidates = catalog.search(&query)?;

    let matcher = IdentityMatcher::new(MatchOptions {
        background,
        ..Default::default()
    });
    let result = matcher.resolve(title, &candidates, None);

    Ok(Resolution {
        title: title.to_string(),
        query,
        candidates: candidates.len(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skhelper_core::{HelperError, MatchStatus, SearchCandidate};

    struct Stub(Vec<SearchCandidate>);

    impl CatalogSearch for Stub {
        fn search(&self, _query: &str) -> skhelper_core::Result<Vec<SearchCandidate>> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl CatalogSearch for Offline {
        fn search(&self, _query: &str) -> skhelper_core::Result<Vec<SearchCandidate>> {
            Err(HelperError::Catalog("offline".to_string()))
        }
    }

    #[test]
    fn test_resolve_reports_query_and_match() {
        let stub = Stub(vec![
            SearchCandidate::new("Celeste", "504230"),
            SearchCandidate::new("Celeste Classic", "1"),
        ]);
        let resolution = resolve_with(&stub, "Celeste™ [GOG]", false).unwrap();
        assert_eq!(resolution.query, "Celeste");
        assert_eq!(resolution.candidates, 2);
        assert_eq!(resolution.result.status, MatchStatus::Exact);
        assert_eq!(resolution.result.catalog_id.as_deref(), Some("504230"));

        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["status"], "exact");
    }

    #[test]
    fn test_resolve_propagates_catalog_errors() {
        assert!(matches!(
            resolve_with(&Offline, "Celeste", false),
            Err(HookError::Core(HelperError::Catalog(_)))
        ));
    }
}
