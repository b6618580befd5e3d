// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

//! The shapes returned to the transport layer. Sidebar, widget and direct
//! answer are pass-through fields owned by other subsystems; ranking never
//! fills them in.

use std::collections::HashMap;

use utoipa::ToSchema;

use crate::ranking::pipeline::RankedWebpage;
use crate::ranking::signals::Signal;
use crate::ranking::SignalScore;
use crate::snippet::{Snippet, StackOverflowAnswer};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedWebpage {
    pub title: String,
    pub url: String,
    pub site: String,
    pub domain: String,
    pub pretty_url: String,
    pub snippet: Snippet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_signals: Option<HashMap<String, SignalScore>>,
}

impl DisplayedWebpage {
    pub fn new(ranked: &RankedWebpage, return_ranking_signals: bool) -> Self {
        let ranking_signals = return_ranking_signals.then(|| {
            ranked
                .signals
                .iter()
                .map(|(signal, score)| (signal.name().to_string(), *score))
                .collect()
        });

        Self {
            title: ranked.webpage.title.clone(),
            url: ranked.webpage.url.to_string(),
            site: ranked.webpage.site().to_string(),
            domain: ranked.webpage.domain(),
            pretty_url: ranked.webpage.pretty_url(),
            snippet: ranked.webpage.snippet.clone(),
            ranking_signals,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedEntity {
    pub title: String,
    pub small_abstract: String,
    pub image_base64: Option<String>,
    pub related_entities: Vec<DisplayedEntity>,
    pub info: Vec<Vec<String>>,
    pub match_score: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Sidebar {
    Entity(DisplayedEntity),
    StackOverflow {
        title: String,
        answer: StackOverflowAnswer,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub input: String,
    pub result: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Widget {
    Calculator(Calculation),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedAnswer {
    pub title: String,
    pub url: String,
    pub pretty_url: String,
    pub answer: String,
    pub snippet: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedSpellCorrection {
    pub raw: String,
    pub highlighted: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebsitesResult {
    pub webpages: Vec<DisplayedWebpage>,
    pub num_hits: usize,
    pub has_more_results: bool,
    pub search_duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<Sidebar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_answer: Option<DisplayedAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_corrected_query: Option<HighlightedSpellCorrection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussions: Option<Vec<DisplayedWebpage>>,
}
