// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use optics::SiteRankings;
use utoipa::ToSchema;

use crate::webpage::Region;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub num_results: Option<usize>,
    #[serde(default)]
    pub selected_region: Option<Region>,
    #[serde(default)]
    pub optic: Option<String>,
    #[serde(default)]
    pub site_rankings: Option<SiteRankings>,
    #[serde(default)]
    pub return_ranking_signals: bool,
    #[serde(default)]
    pub safe_search: bool,
    /// Pass-through for the transport layer; ranking ignores it.
    #[serde(default)]
    pub flatten_response: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 0,
            num_results: None,
            selected_region: None,
            optic: None,
            site_rankings: None,
            return_ranking_signals: false,
            safe_search: false,
            flatten_response: false,
        }
    }
}

impl SearchQuery {
    pub fn simple_terms(&self) -> Vec<String> {
        self.query
            .split_whitespace()
            .map(|term| term.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let query: SearchQuery = serde_json::from_str(r#"{"query": "hello world"}"#).unwrap();

        assert_eq!(query.query, "hello world");
        assert_eq!(query.page, 0);
        assert!(query.num_results.is_none());
        assert!(!query.return_ranking_signals);
    }

    #[test]
    fn camel_case_field_names() {
        let query: SearchQuery = serde_json::from_str(
            r#"{
                "query": "rust",
                "returnRankingSignals": true,
                "siteRankings": {"liked": ["a.com"], "disliked": [], "blocked": []},
                "selectedRegion": "Denmark"
            }"#,
        )
        .unwrap();

        assert!(query.return_ranking_signals);
        assert_eq!(query.selected_region, Some(Region::Denmark));
        assert_eq!(
            query.site_rankings.unwrap().liked,
            vec!["a.com".to_string()]
        );
    }

    #[test]
    fn terms_are_lowercased() {
        let query = SearchQuery {
            query: "Rust Borrow CHECKER".to_string(),
            ..Default::default()
        };

        assert_eq!(query.simple_terms(), vec!["rust", "borrow", "checker"]);
    }
}
