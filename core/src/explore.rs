// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

//! Exports a user's explored sites as an optic: the chosen sites are liked
//! outright, and the candidate similar sites receive boost rules weighted
//! by their similarity rank against the chosen set.

use std::collections::HashSet;
use std::time::Duration;

use itertools::Itertools;
use optics::{Action, MatchLocation, Matching, Optic, PatternPart, Rule, SiteRankings};

use crate::webgraph::SimilarSitesProvider;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
const SIMILARITY_TOP_N: usize = 100;

pub struct ExploreExporter<P> {
    provider: P,
    lookup_timeout: Duration,
}

impl<P: SimilarSitesProvider> ExploreExporter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(provider: P, lookup_timeout: Duration) -> Self {
        Self {
            provider,
            lookup_timeout,
        }
    }

    /// Derive an optic from the sites a user chose while exploring, plus
    /// the similar sites offered to them. The webgraph lookup runs under a
    /// deadline; if it times out or fails, the export falls back to the
    /// chosen sites alone rather than returning a partial rule set.
    pub async fn export(&self, chosen_sites: &[String], similar_sites: &[String]) -> Optic {
        let scored = match tokio::time::timeout(
            self.lookup_timeout,
            self.provider.similar_sites(chosen_sites, SIMILARITY_TOP_N),
        )
        .await
        {
            Ok(Ok(scored)) => scored,
            Ok(Err(err)) => {
                tracing::warn!(?err, "webgraph similarity lookup failed");
                return self.fallback(chosen_sites);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "webgraph similarity lookup timed out"
                );
                return self.fallback(chosen_sites);
            }
        };

        let candidates: HashSet<&str> = similar_sites.iter().map(String::as_str).collect();

        let matched: Vec<_> = scored
            .into_iter()
            .filter(|scored| scored.score > 0.0)
            .filter(|scored| candidates.contains(scored.site.as_str()))
            .sorted_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| a.site.cmp(&b.site))
            })
            .collect();

        let num_matched = matched.len();
        let rules = matched
            .into_iter()
            .enumerate()
            .map(|(rank, scored)| boost_rule(&scored.site, (num_matched - rank) as u64))
            .collect();

        let mut optic = self.fallback(chosen_sites);
        optic.rules = rules;
        optic
    }

    fn fallback(&self, chosen_sites: &[String]) -> Optic {
        Optic::from_rankings(&SiteRankings {
            liked: chosen_sites.to_vec(),
            ..Default::default()
        })
    }
}

fn boost_rule(site: &str, amount: u64) -> Rule {
    Rule {
        matches: vec![Matching {
            location: MatchLocation::Site,
            pattern: vec![
                PatternPart::Anchor,
                PatternPart::Raw(site.to_string()),
                PatternPart::Anchor,
            ],
        }],
        action: Action::Boost(amount),
    }
}
