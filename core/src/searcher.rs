// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use std::time::Instant;

use chrono::Utc;
use optics::Optic;

use crate::config::SearcherConfig;
use crate::query::SearchQuery;
use crate::ranking::pipeline::RankingPipeline;
use crate::ranking::signals::SignalEnum;
use crate::ranking::QueryData;
use crate::search_prettifier::{DisplayedWebpage, WebsitesResult};
use crate::{Error, Result};

/// The retrieval collaborator: turns a query into candidate webpages with
/// their precomputed base features.
pub trait CandidateProvider: Send + Sync {
    fn retrieve(&self, query: &SearchQuery) -> anyhow::Result<Vec<crate::webpage::Webpage>>;
}

/// Compile optic source text. Signal targets are validated against the
/// registry here, so the ranking pipeline can treat the optic as already
/// checked and never fails on a missing signal at rank time.
pub fn compile(source: &str) -> Result<Optic> {
    let optic = Optic::parse(source)?;

    for coeff in &optic.rankings {
        if SignalEnum::from_name(&coeff.target).is_none() {
            return Err(Error::Optic(optics::Error::UnknownSignal(
                coeff.target.clone(),
            )));
        }
    }

    Ok(optic)
}

pub struct Searcher<P> {
    provider: P,
    config: SearcherConfig,
}

impl<P: CandidateProvider> Searcher<P> {
    pub fn new(provider: P, config: SearcherConfig) -> Self {
        Self { provider, config }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<WebsitesResult> {
        let start = Instant::now();

        // compiler errors fail the request closed before any ranking work
        let optic = query.optic.as_deref().map(compile).transpose()?;

        let candidates = self.provider.retrieve(query)?;

        let query_data = QueryData::new(
            query.simple_terms(),
            query.selected_region,
            Utc::now().timestamp(),
        );

        let pipeline = RankingPipeline::new(
            query_data,
            self.config.base_coefficients(),
            optic.as_ref(),
            query.site_rankings.as_ref(),
            query.safe_search,
        );

        let ranked = pipeline.rank(candidates);
        let num_hits = ranked.len();

        let num_results = query
            .num_results
            .unwrap_or(self.config.default_num_results)
            .min(self.config.max_num_results);
        let offset = query.page * num_results;

        let has_more_results = num_hits > offset + num_results;

        let webpages: Vec<DisplayedWebpage> = ranked
            .iter()
            .skip(offset)
            .take(num_results)
            .map(|page| DisplayedWebpage::new(page, query.return_ranking_signals))
            .collect();

        tracing::debug!(
            query = %query.query,
            num_hits,
            returned = webpages.len(),
            "ranked candidates"
        );

        Ok(WebsitesResult {
            webpages,
            num_hits,
            has_more_results,
            search_duration_ms: start.elapsed().as_millis() as u64,
            sidebar: None,
            widget: None,
            direct_answer: None,
            spell_corrected_query: None,
            discussions: None,
        })
    }
}
