// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use chrono::{DateTime, Utc};
use url::Url;
use utoipa::ToSchema;

use crate::snippet::Snippet;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ToSchema,
)]
pub enum Region {
    All,
    Denmark,
    France,
    Germany,
    Spain,
    US,
}

/// A candidate webpage as delivered by the retrieval collaborator. The raw
/// feature values are precomputed at index time; this crate only combines
/// them. Immutable for the duration of a ranking request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Webpage {
    pub url: Url,
    pub title: String,
    pub description: Option<String>,
    pub snippet: Snippet,
    pub region: Region,
    pub schema_org_types: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub fetch_time_ms: u64,
    pub num_trackers: u64,
    pub host_centrality: f64,
    pub page_centrality: f64,
    pub title_bm25: f64,
    pub body_bm25: f64,
    pub likely_explicit: bool,
}

impl Webpage {
    pub fn site(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// The registrable part of the host. A heuristic (last two labels)
    /// rather than a full public-suffix lookup.
    pub fn domain(&self) -> String {
        domain_from_host(self.site())
    }

    pub fn pretty_url(&self) -> String {
        let mut pretty = format!("{}{}", self.site(), self.url.path());
        if pretty.ends_with('/') && self.url.path() != "/" {
            pretty.pop();
        }
        pretty
    }
}

pub fn domain_from_host(host: &str) -> String {
    let labels: Vec<&str> = host.rsplitn(3, '.').collect();

    match labels.as_slice() {
        [tld, sld, ..] => format!("{sld}.{tld}"),
        _ => host.to_string(),
    }
}
