// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

//! Query-time ranking customization: combines base relevance signals for
//! candidate webpages with user-supplied site preferences and an optional
//! optic program, producing an explainable ranked result list. The inverse
//! operation exports a user's preferences back out as optic source text.
//!
//! Retrieval, indexing and the HTTP layer are external collaborators; see
//! [`searcher::CandidateProvider`] and [`webgraph::SimilarSitesProvider`].

pub mod config;
pub mod explore;
pub mod highlighted;
pub mod query;
pub mod ranking;
pub mod search_prettifier;
pub mod searcher;
pub mod snippet;
pub mod webgraph;
pub mod webpage;

pub use searcher::{compile, Searcher};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("optic: {0}")]
    Optic(#[from] optics::Error),

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("candidate retrieval: {0}")]
    Retrieval(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
