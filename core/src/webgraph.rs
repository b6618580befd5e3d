// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

//! The webgraph similarity service is an external collaborator; ranking
//! only consumes its scores.

use async_trait::async_trait;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSite {
    pub site: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[async_trait]
pub trait SimilarSitesProvider: Send + Sync {
    /// Sites most similar to the seed set, ordered by descending score.
    async fn similar_sites(&self, sites: &[String], top_n: usize)
        -> anyhow::Result<Vec<ScoredSite>>;
}
