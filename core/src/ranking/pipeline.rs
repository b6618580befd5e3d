// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use std::collections::{HashMap, HashSet};

use optics::{Action, MatchLocation, Optic, Rule, SiteRankings, LIKED_SITE_DELTA};
use rayon::prelude::*;

use super::{QueryData, SignalCoefficients, SignalScore};
use crate::ranking::signals::{Signal, SignalEnum};
use crate::webpage::Webpage;

#[derive(Debug, Clone)]
pub struct RankedWebpage {
    pub webpage: Webpage,
    pub score: f64,
    pub signals: HashMap<SignalEnum, SignalScore>,
}

/// Computes the per-signal (coefficient, value) map for one webpage.
/// Immutable once built, so candidates can be scored in parallel.
#[derive(Debug, Clone)]
pub struct SignalComputer {
    query: QueryData,
    coefficients: SignalCoefficients,
}

impl SignalComputer {
    pub fn new(query: QueryData, coefficients: SignalCoefficients) -> Self {
        Self {
            query,
            coefficients,
        }
    }

    pub fn compute_signals(&self, webpage: &Webpage) -> HashMap<SignalEnum, SignalScore> {
        SignalEnum::all()
            .map(|signal| {
                let score = SignalScore {
                    coefficient: self.coefficients.get(&signal),
                    value: signal.compute(webpage, &self.query).unwrap_or(0.0),
                };
                (signal, score)
            })
            .collect()
    }
}

/// The full query-time ranking pipeline for one request. Built once per
/// request from the (already compiled) optic and the request's explicit
/// site rankings, then applied to the candidate set.
pub struct RankingPipeline {
    computer: SignalComputer,
    rules: Vec<Rule>,
    discard_non_matching: bool,
    host_rankings: SiteRankings,
    /// Sites the explicit request-level rankings mention. Optic discard
    /// rules are suppressed for these, so live preferences always win over
    /// an exported, possibly stale, optic.
    explicit_sites: HashSet<String>,
    safe_search: bool,
}

impl RankingPipeline {
    pub fn new(
        query: QueryData,
        mut coefficients: SignalCoefficients,
        optic: Option<&Optic>,
        site_rankings: Option<&SiteRankings>,
        safe_search: bool,
    ) -> Self {
        if let Some(optic) = optic {
            coefficients.apply_optic(optic);
        }

        let explicit_sites: HashSet<String> = site_rankings
            .map(|rankings| rankings.sites().map(String::from).collect())
            .unwrap_or_default();

        Self {
            computer: SignalComputer::new(query, coefficients),
            rules: optic.map(|o| o.rules.clone()).unwrap_or_default(),
            discard_non_matching: optic.map(|o| o.discard_non_matching).unwrap_or(false),
            host_rankings: merge_host_rankings(optic, site_rankings),
            explicit_sites,
            safe_search,
        }
    }

    /// Rank the candidate set: filter blocked sites, score the remaining
    /// pages in parallel, then sort descending by score with a stable
    /// tie-break on candidate order.
    pub fn rank(&self, candidates: Vec<Webpage>) -> Vec<RankedWebpage> {
        let mut ranked: Vec<RankedWebpage> = candidates
            .into_par_iter()
            .filter(|webpage| !self.is_discarded(webpage))
            .map(|webpage| {
                let signals = self.computer.compute_signals(&webpage);

                // summed in registry order; float addition is not associative
                // and map iteration order is unstable, so summing the map
                // directly would make repeated runs disagree in the last bits
                let base: f64 = SignalEnum::all()
                    .filter_map(|signal| signals.get(&signal))
                    .map(SignalScore::contribution)
                    .sum();
                let score = base + self.rule_delta(&webpage) + self.preference_delta(&webpage);

                RankedWebpage {
                    webpage,
                    score,
                    signals,
                }
            })
            .collect();

        // rayon preserves candidate order, and the sort is stable, so ties
        // keep their original order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        ranked
    }

    fn is_discarded(&self, webpage: &Webpage) -> bool {
        if self.safe_search && webpage.likely_explicit {
            return true;
        }

        let site = webpage.site();

        if self.host_rankings.blocked.iter().any(|s| s == site) {
            return true;
        }

        let explicitly_ranked = self.explicit_sites.contains(site);

        let discarded_by_rule = !explicitly_ranked
            && self
                .rules
                .iter()
                .any(|rule| rule.action == Action::Discard && rule_matches(rule, webpage));

        if discarded_by_rule {
            return true;
        }

        if self.discard_non_matching {
            return !self.rules.iter().any(|rule| rule_matches(rule, webpage));
        }

        false
    }

    /// Flat boost/demotion deltas from matched optic rules, folded in rule
    /// order.
    fn rule_delta(&self, webpage: &Webpage) -> f64 {
        self.rules
            .iter()
            .filter(|rule| rule_matches(rule, webpage))
            .fold(0.0, |delta, rule| match rule.action {
                Action::Boost(amount) => delta + amount as f64,
                Action::Downrank(amount) => delta - amount as f64,
                Action::Discard => delta,
            })
    }

    fn preference_delta(&self, webpage: &Webpage) -> f64 {
        let site = webpage.site();

        if self.host_rankings.liked.iter().any(|s| s == site) {
            LIKED_SITE_DELTA as f64
        } else if self.host_rankings.disliked.iter().any(|s| s == site) {
            -(LIKED_SITE_DELTA as f64)
        } else {
            0.0
        }
    }
}

/// Overlay the explicit request-level site rankings on the optic's host
/// rankings. Any site the explicit rankings mention is removed from the
/// optic's sets first, so the explicit placement wins.
fn merge_host_rankings(
    optic: Option<&Optic>,
    explicit: Option<&SiteRankings>,
) -> SiteRankings {
    let mut merged = optic
        .map(|o| o.host_rankings.clone())
        .unwrap_or_default();

    if let Some(explicit) = explicit {
        let mentioned: HashSet<&str> = explicit.sites().collect();

        merged.liked.retain(|site| !mentioned.contains(site.as_str()));
        merged
            .disliked
            .retain(|site| !mentioned.contains(site.as_str()));
        merged
            .blocked
            .retain(|site| !mentioned.contains(site.as_str()));

        merged.liked.extend(explicit.liked.iter().cloned());
        merged.disliked.extend(explicit.disliked.iter().cloned());
        merged.blocked.extend(explicit.blocked.iter().cloned());
    }

    merged.normalized()
}

fn rule_matches(rule: &Rule, webpage: &Webpage) -> bool {
    rule.matches.iter().all(|matching| match matching.location {
        MatchLocation::Site => matching.matches(webpage.site()),
        MatchLocation::Url => matching.matches(webpage.url.as_str()),
        MatchLocation::Domain => matching.matches(&webpage.domain()),
        MatchLocation::Title => matching.matches(&webpage.title),
        MatchLocation::Description => {
            matching.matches(webpage.description.as_deref().unwrap_or_default())
        }
        MatchLocation::Content => matching.matches(&webpage.snippet.plain_text()),
        MatchLocation::Schema => webpage
            .schema_org_types
            .iter()
            .any(|schema_type| matching.matches(schema_type)),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::snippet::{Snippet, TextSnippet};
    use crate::webpage::Region;

    pub(crate) fn test_page(url: &str, title_bm25: f64) -> Webpage {
        Webpage {
            url: url::Url::parse(url).unwrap(),
            title: "test page".to_string(),
            description: None,
            snippet: Snippet::Normal {
                date: None,
                text: TextSnippet::unhighlighted("a test snippet".to_string()),
            },
            region: Region::All,
            schema_org_types: Vec::new(),
            last_updated: None,
            fetch_time_ms: 0,
            num_trackers: 0,
            host_centrality: 0.0,
            page_centrality: 0.0,
            title_bm25,
            body_bm25: 0.0,
            likely_explicit: false,
        }
    }

    fn query() -> QueryData {
        QueryData::new(vec!["test".to_string()], None, 1_700_000_000)
    }

    fn pipeline(optic: Option<&Optic>, rankings: Option<&SiteRankings>) -> RankingPipeline {
        RankingPipeline::new(
            query(),
            SignalCoefficients::default(),
            optic,
            rankings,
            false,
        )
    }

    fn sites(ranked: &[RankedWebpage]) -> Vec<&str> {
        ranked.iter().map(|page| page.webpage.site()).collect()
    }

    #[test]
    fn blocked_site_never_appears() {
        let candidates = vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 2.0),
        ];
        let rankings = SiteRankings {
            blocked: vec!["b.com".to_string()],
            ..Default::default()
        };

        let ranked = pipeline(None, Some(&rankings)).rank(candidates);

        assert_eq!(sites(&ranked), vec!["a.com"]);
    }

    #[test]
    fn blocked_beats_optic_boost() {
        let optic = Optic::parse(
            r#"
            Rule {
                Matches { Site("|b.com|") },
                Action(Boost(100))
            };
        "#,
        )
        .unwrap();
        let rankings = SiteRankings {
            blocked: vec!["b.com".to_string()],
            ..Default::default()
        };

        let ranked = pipeline(Some(&optic), Some(&rankings)).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 2.0),
        ]);

        assert_eq!(sites(&ranked), vec!["a.com"]);
    }

    #[test]
    fn flat_boost_breaks_base_score_tie() {
        let optic = Optic::parse(
            r#"
            Rule {
                Matches { Site("|news.example|") },
                Action(Boost(5))
            };
        "#,
        )
        .unwrap();

        let ranked = pipeline(Some(&optic), None).rank(vec![
            test_page("https://other.example/", 1.0),
            test_page("https://news.example/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["news.example", "other.example"]);
    }

    #[test]
    fn downrank_demotes() {
        let optic = Optic::parse(
            r#"
            Rule {
                Matches { Site("|a.com|") },
                Action(Downrank(5))
            };
        "#,
        )
        .unwrap();

        let ranked = pipeline(Some(&optic), None).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["b.com", "a.com"]);
    }

    #[test]
    fn explicit_rankings_override_optic_discard() {
        // an exported optic discards b.com, but the live preferences like it
        let optic = Optic::from_rankings(&SiteRankings {
            blocked: vec!["b.com".to_string()],
            ..Default::default()
        });
        let rankings = SiteRankings {
            liked: vec!["b.com".to_string()],
            ..Default::default()
        };

        let ranked = pipeline(Some(&optic), Some(&rankings)).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["b.com", "a.com"]);
    }

    #[test]
    fn explicit_dislike_overrides_optic_like() {
        let optic = Optic::parse(r#"Like(Site("b.com"));"#).unwrap();
        let rankings = SiteRankings {
            disliked: vec!["b.com".to_string()],
            ..Default::default()
        };

        let ranked = pipeline(Some(&optic), Some(&rankings)).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["a.com", "b.com"]);
    }

    #[test]
    fn liked_sites_rank_higher() {
        let rankings = SiteRankings {
            liked: vec!["b.com".to_string()],
            ..Default::default()
        };

        let ranked = pipeline(None, Some(&rankings)).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["b.com", "a.com"]);
    }

    #[test]
    fn empty_candidate_set_is_not_an_error() {
        let ranked = pipeline(None, None).rank(Vec::new());
        assert!(ranked.is_empty());
    }

    #[test]
    fn ties_keep_candidate_order() {
        let ranked = pipeline(None, None).rank(vec![
            test_page("https://first.com/", 1.0),
            test_page("https://second.com/", 1.0),
            test_page("https://third.com/", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["first.com", "second.com", "third.com"]);
    }

    #[test]
    fn ranking_is_deterministic() {
        let candidates = vec![
            test_page("https://a.com/", 0.3),
            test_page("https://b.com/", 0.7),
            test_page("https://c.com/", 0.5),
        ];

        let first = pipeline(None, None).rank(candidates.clone());
        let second = pipeline(None, None).rank(candidates);

        assert_eq!(sites(&first), sites(&second));
        let first_scores: Vec<f64> = first.iter().map(|p| p.score).collect();
        let second_scores: Vec<f64> = second.iter().map(|p| p.score).collect();
        assert_eq!(first_scores, second_scores);
    }

    #[test]
    fn repeated_runs_produce_bit_identical_scores() {
        // equality on f64 would hide last-bit drift from an unstable
        // summation order, so compare the raw bit patterns
        let candidates = vec![
            test_page("https://a.com/", 0.3),
            test_page("https://b.com/", 0.7),
        ];

        let reference: Vec<u64> = pipeline(None, None)
            .rank(candidates.clone())
            .iter()
            .map(|page| page.score.to_bits())
            .collect();

        for _ in 0..64 {
            let bits: Vec<u64> = pipeline(None, None)
                .rank(candidates.clone())
                .iter()
                .map(|page| page.score.to_bits())
                .collect();

            assert_eq!(bits, reference);
        }
    }

    #[test]
    fn raising_a_coefficient_never_demotes_the_stronger_page() {
        let strong = test_page("https://strong.com/", 2.0);
        let weak = test_page("https://weak.com/", 1.0);

        let baseline = pipeline(None, None).rank(vec![weak.clone(), strong.clone()]);
        assert_eq!(sites(&baseline), vec!["strong.com", "weak.com"]);

        let optic = Optic::parse(r#"Ranking(Signal("bm25_title"), 50);"#).unwrap();
        let boosted = pipeline(Some(&optic), None).rank(vec![weak, strong]);

        assert_eq!(sites(&boosted), vec!["strong.com", "weak.com"]);
    }

    #[test]
    fn exported_optic_is_ranking_equivalent_to_rankings() {
        let rankings = SiteRankings {
            liked: vec!["liked.com".to_string()],
            disliked: vec!["disliked.com".to_string()],
            blocked: vec!["blocked.com".to_string()],
        };
        let candidates = vec![
            test_page("https://plain.com/", 1.0),
            test_page("https://liked.com/", 1.0),
            test_page("https://disliked.com/", 1.0),
            test_page("https://blocked.com/", 1.0),
        ];

        let direct = pipeline(None, Some(&rankings)).rank(candidates.clone());

        let exported = Optic::from_rankings(&rankings).to_string();
        let optic = crate::compile(&exported).unwrap();
        let via_optic = pipeline(Some(&optic), None).rank(candidates);

        assert_eq!(sites(&direct), sites(&via_optic));
        assert_eq!(sites(&direct), vec!["liked.com", "plain.com", "disliked.com"]);
    }

    #[test]
    fn discard_non_matching_keeps_only_matched_pages() {
        let optic = Optic::parse(
            r#"
            DiscardNonMatching;
            Rule {
                Matches { Site("|a.com|") }
            };
        "#,
        )
        .unwrap();

        let ranked = pipeline(Some(&optic), None).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 5.0),
        ]);

        assert_eq!(sites(&ranked), vec!["a.com"]);
    }

    #[test]
    fn safe_search_drops_explicit_pages() {
        let mut explicit = test_page("https://a.com/", 5.0);
        explicit.likely_explicit = true;

        let ranked = RankingPipeline::new(
            query(),
            SignalCoefficients::default(),
            None,
            None,
            true,
        )
        .rank(vec![explicit, test_page("https://b.com/", 1.0)]);

        assert_eq!(sites(&ranked), vec!["b.com"]);
    }

    #[test]
    fn url_rule_matches_path() {
        let optic = Optic::parse(
            r#"
            Rule {
                Matches { Url("*forum*") },
                Action(Boost(10))
            };
        "#,
        )
        .unwrap();

        let ranked = pipeline(Some(&optic), None).rank(vec![
            test_page("https://a.com/blog/1", 1.0),
            test_page("https://b.com/forum/1", 1.0),
        ]);

        assert_eq!(sites(&ranked), vec!["b.com", "a.com"]);
    }

    mod properties {
        use super::*;
        use crate::webpage::Webpage;
        use optics::SiteRankings;
        use proptest::prelude::*;

        fn candidates_strategy() -> impl Strategy<Value = Vec<(u8, f64)>> {
            prop::collection::vec((0u8..20, 0.0f64..10.0), 0..12)
        }

        fn build(candidates: &[(u8, f64)]) -> Vec<Webpage> {
            candidates
                .iter()
                .map(|(site, score)| test_page(&format!("https://site{site}.com/"), *score))
                .collect()
        }

        proptest! {
            #[test]
            fn ranking_twice_is_identical(candidates in candidates_strategy()) {
                let first = pipeline(None, None).rank(build(&candidates));
                let second = pipeline(None, None).rank(build(&candidates));

                prop_assert_eq!(sites(&first), sites(&second));

                let first_scores: Vec<f64> = first.iter().map(|p| p.score).collect();
                let second_scores: Vec<f64> = second.iter().map(|p| p.score).collect();
                prop_assert_eq!(first_scores, second_scores);
            }

            #[test]
            fn blocked_site_is_absent_for_any_candidate_set(
                candidates in candidates_strategy(),
                blocked in 0u8..20,
            ) {
                let rankings = SiteRankings {
                    blocked: vec![format!("site{blocked}.com")],
                    ..Default::default()
                };

                let ranked = pipeline(None, Some(&rankings)).rank(build(&candidates));

                prop_assert!(ranked
                    .iter()
                    .all(|page| page.webpage.site() != rankings.blocked[0]));
            }
        }
    }

    #[test]
    fn conjunctive_clauses_must_all_match() {
        let optic = Optic::parse(
            r#"
            Rule {
                Matches {
                    Site("|a.com|"),
                    Title("nope")
                },
                Action(Boost(10))
            };
        "#,
        )
        .unwrap();

        let ranked = pipeline(Some(&optic), None).rank(vec![
            test_page("https://a.com/", 1.0),
            test_page("https://b.com/", 1.0),
        ]);

        // clause on the title does not match, so no boost is applied
        assert_eq!(sites(&ranked), vec!["a.com", "b.com"]);
        assert_eq!(ranked[0].score, ranked[1].score);
    }
}
