// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use enum_dispatch::enum_dispatch;

use super::QueryData;
use crate::webpage::{Region as WebpageRegion, Webpage};

#[inline]
fn score_inverse(count: f64) -> f64 {
    1.0 / (count + 1.0)
}

fn score_timestamp(page_timestamp: i64, current_timestamp: i64) -> f64 {
    if page_timestamp >= current_timestamp {
        return 0.0;
    }

    let hours_since_update = ((current_timestamp - page_timestamp).max(1) / 3600) as f64;
    score_inverse(hours_since_update)
}

fn score_region(webpage_region: WebpageRegion, ctx: &QueryData) -> f64 {
    match ctx.selected_region() {
        Some(region) if region != WebpageRegion::All && region == webpage_region => 50.0,
        _ => 0.0,
    }
}

fn score_fetch_time(fetch_time_ms: u64) -> f64 {
    // pages slower than a second score 0
    if fetch_time_ms >= 1000 {
        0.0
    } else {
        1.0 - fetch_time_ms as f64 / 1000.0
    }
}

/// A named, independently computable numeric feature of a (query, webpage)
/// pair. Signals that cannot be computed yield `None` and contribute 0 to
/// the aggregate score; they never fail a ranking request.
#[enum_dispatch]
pub trait Signal: Clone + Copy + std::fmt::Debug {
    fn default_coefficient(&self) -> f64;

    fn name(&self) -> &'static str;

    fn compute(&self, webpage: &Webpage, ctx: &QueryData) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bm25Title;
impl Signal for Bm25Title {
    fn default_coefficient(&self) -> f64 {
        2.0
    }

    fn name(&self) -> &'static str {
        "bm25_title"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(webpage.title_bm25)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bm25Body;
impl Signal for Bm25Body {
    fn default_coefficient(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "bm25_body"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(webpage.body_bm25)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TitleCoverage;
impl Signal for TitleCoverage {
    fn default_coefficient(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "title_coverage"
    }

    /// Fraction of query terms present in the title.
    fn compute(&self, webpage: &Webpage, ctx: &QueryData) -> Option<f64> {
        if ctx.terms().is_empty() {
            return None;
        }

        let title = webpage.title.to_lowercase();
        let covered = ctx
            .terms()
            .iter()
            .filter(|term| title.contains(term.as_str()))
            .count();

        Some(covered as f64 / ctx.terms().len() as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HostCentrality;
impl Signal for HostCentrality {
    fn default_coefficient(&self) -> f64 {
        0.5
    }

    fn name(&self) -> &'static str {
        "host_centrality"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(webpage.host_centrality)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PageCentrality;
impl Signal for PageCentrality {
    fn default_coefficient(&self) -> f64 {
        0.25
    }

    fn name(&self) -> &'static str {
        "page_centrality"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(webpage.page_centrality)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct UpdateTimestamp;
impl Signal for UpdateTimestamp {
    fn default_coefficient(&self) -> f64 {
        0.001
    }

    fn name(&self) -> &'static str {
        "update_timestamp"
    }

    fn compute(&self, webpage: &Webpage, ctx: &QueryData) -> Option<f64> {
        let timestamp = webpage.last_updated?.timestamp();
        Some(score_timestamp(timestamp, ctx.current_timestamp()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FetchTimeMs;
impl Signal for FetchTimeMs {
    fn default_coefficient(&self) -> f64 {
        0.001
    }

    fn name(&self) -> &'static str {
        "fetch_time_ms"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(score_fetch_time(webpage.fetch_time_ms))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TrackerScore;
impl Signal for TrackerScore {
    fn default_coefficient(&self) -> f64 {
        0.05
    }

    fn name(&self) -> &'static str {
        "tracker_score"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        Some(score_inverse(webpage.num_trackers as f64))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region;
impl Signal for Region {
    fn default_coefficient(&self) -> f64 {
        0.15
    }

    fn name(&self) -> &'static str {
        "region"
    }

    fn compute(&self, webpage: &Webpage, ctx: &QueryData) -> Option<f64> {
        Some(score_region(webpage.region, ctx))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct UrlSlashes;
impl Signal for UrlSlashes {
    fn default_coefficient(&self) -> f64 {
        0.01
    }

    fn name(&self) -> &'static str {
        "url_slashes"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        let num_slashes = webpage
            .url
            .path()
            .chars()
            .filter(|c| c == &'/')
            .count() as f64;
        Some(score_inverse(num_slashes))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct UrlDigits;
impl Signal for UrlDigits {
    fn default_coefficient(&self) -> f64 {
        0.01
    }

    fn name(&self) -> &'static str {
        "url_digits"
    }

    fn compute(&self, webpage: &Webpage, _: &QueryData) -> Option<f64> {
        let num_digits = (webpage
            .url
            .path()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count()
            + webpage
                .url
                .query()
                .unwrap_or_default()
                .chars()
                .filter(|c| c.is_ascii_digit())
                .count()) as f64;

        Some(score_inverse(num_digits))
    }
}

#[enum_dispatch(Signal)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, strum::EnumIter,
)]
pub enum SignalEnum {
    Bm25Title,
    Bm25Body,
    TitleCoverage,
    HostCentrality,
    PageCentrality,
    UpdateTimestamp,
    FetchTimeMs,
    TrackerScore,
    Region,
    UrlSlashes,
    UrlDigits,
}

impl SignalEnum {
    /// All signals, in declaration order.
    pub fn all() -> impl Iterator<Item = SignalEnum> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn from_name(name: &str) -> Option<SignalEnum> {
        Self::all().find(|signal| signal.name() == name)
    }
}
