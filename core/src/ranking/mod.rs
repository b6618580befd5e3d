// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

pub mod pipeline;
pub mod signals;

use std::collections::HashMap;

use utoipa::ToSchema;

use crate::webpage::Region;
use signals::{Signal, SignalEnum};

/// One signal's contribution to a webpage's final score:
/// `coefficient * value`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct SignalScore {
    pub coefficient: f64,
    pub value: f64,
}

impl SignalScore {
    pub fn contribution(&self) -> f64 {
        self.coefficient * self.value
    }
}

/// Effective coefficient per signal: registry defaults overlaid with optic
/// `Ranking` statements. Later statements override earlier ones for the
/// same signal.
#[derive(Debug, Clone, Default)]
pub struct SignalCoefficients {
    overrides: HashMap<SignalEnum, f64>,
}

impl SignalCoefficients {
    pub fn get(&self, signal: &SignalEnum) -> f64 {
        self.overrides
            .get(signal)
            .copied()
            .unwrap_or_else(|| signal.default_coefficient())
    }

    pub fn insert(&mut self, signal: SignalEnum, coefficient: f64) {
        self.overrides.insert(signal, coefficient);
    }

    pub fn apply_optic(&mut self, optic: &optics::Optic) {
        for coeff in &optic.rankings {
            if let Some(signal) = SignalEnum::from_name(&coeff.target) {
                self.overrides.insert(signal, coeff.value);
            }
        }
    }
}

/// Query-derived context shared by all signal computations for one request.
/// Immutable, so it can be shared freely across rayon workers.
#[derive(Debug, Clone)]
pub struct QueryData {
    terms: Vec<String>,
    selected_region: Option<Region>,
    current_timestamp: i64,
}

impl QueryData {
    pub fn new(terms: Vec<String>, selected_region: Option<Region>, current_timestamp: i64) -> Self {
        Self {
            terms,
            selected_region,
            current_timestamp,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn selected_region(&self) -> Option<Region> {
        self.selected_region
    }

    pub fn current_timestamp(&self) -> i64 {
        self.current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::signals::Bm25Title;
    use super::*;

    #[test]
    fn coefficient_defaults_and_overrides() {
        let mut coefficients = SignalCoefficients::default();
        let signal: SignalEnum = Bm25Title.into();

        assert_eq!(coefficients.get(&signal), signal.default_coefficient());

        coefficients.insert(signal, 12.0);
        assert_eq!(coefficients.get(&signal), 12.0);
    }

    #[test]
    fn later_optic_statement_wins() {
        let optic = optics::Optic::parse(
            r#"
            Ranking(Signal("bm25_title"), 1);
            Ranking(Signal("bm25_title"), 7);
        "#,
        )
        .unwrap();

        let mut coefficients = SignalCoefficients::default();
        coefficients.apply_optic(&optic);

        assert_eq!(coefficients.get(&Bm25Title.into()), 7.0);
    }
}
