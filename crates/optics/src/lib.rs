// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

//! The optic language: a small declarative program expressing ranking
//! preferences as portable source text.
//!
//! An optic consists of top-level statements:
//!
//! ```text
//! DiscardNonMatching;
//! Ranking(Signal("bm25_title"), 3);
//! Rule {
//!     Matches {
//!         Site("|example.com|"),
//!         Title("*rust*"),
//!     },
//!     Action(Boost(5))
//! };
//! Like(Site("kernel.org"));
//! Dislike(Site("ads.example"));
//! ```
//!
//! Clauses inside a `Matches` block must all match for the rule to apply.
//! Statement order is semantically significant: a later `Ranking` statement
//! overrides an earlier one for the same signal.

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;
use utoipa::ToSchema;

mod lexer;
mod parser;

/// Flat score delta applied to pages from liked (`+`) and disliked (`-`)
/// sites when an optic or site rankings are applied at rank time.
pub const LIKED_SITE_DELTA: u64 = 5;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("syntax error at bytes {start}..{end}: expected {expected}, found {found}")]
    Syntax {
        start: usize,
        end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("unknown signal {0:?}")]
    UnknownSignal(String),
}

impl Error {
    pub(crate) fn syntax(expected: &str, found: &str, span: std::ops::Range<usize>) -> Self {
        Error::Syntax {
            start: span.start,
            end: span.end,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// A compiled optic. Immutable once parsed; rule order is preserved.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Optic {
    pub rankings: Vec<RankingCoeff>,
    pub rules: Vec<Rule>,
    pub discard_non_matching: bool,
    pub host_rankings: SiteRankings,
}

impl Optic {
    pub fn parse(source: &str) -> Result<Self> {
        parser::parse(source)
    }

    /// Export site rankings as an optic: one discard rule per blocked site,
    /// one `Dislike` per disliked site and one `Like` per liked site, in
    /// sorted-by-site order so the exported text is reproducible.
    pub fn from_rankings(rankings: &SiteRankings) -> Self {
        let rankings = rankings.normalized();

        Self {
            rules: rankings.blocked.iter().map(|site| Rule::discard_site(site)).collect(),
            host_rankings: SiteRankings {
                liked: rankings.liked,
                disliked: rankings.disliked,
                blocked: Vec::new(),
            },
            ..Default::default()
        }
    }
}

impl Display for Optic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.discard_non_matching {
            writeln!(f, "DiscardNonMatching;")?;
        }

        for ranking in &self.rankings {
            writeln!(f, "{ranking}")?;
        }

        for rule in &self.rules {
            write!(f, "{rule}")?;
        }

        for site in &self.host_rankings.liked {
            writeln!(f, "Like(Site(\"{site}\"));")?;
        }

        for site in &self.host_rankings.disliked {
            writeln!(f, "Dislike(Site(\"{site}\"));")?;
        }

        for site in &self.host_rankings.blocked {
            write!(f, "{}", Rule::discard_site(site))?;
        }

        Ok(())
    }
}

/// A signal coefficient override: `Ranking(Signal("name"), value);`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingCoeff {
    pub target: String,
    pub value: f64,
}

impl Display for RankingCoeff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ranking(Signal(\"{}\"), {});", self.target, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub matches: Vec<Matching>,
    pub action: Action,
}

impl Rule {
    /// An exact-site exclusion rule.
    pub fn discard_site(site: &str) -> Self {
        Self {
            matches: vec![Matching {
                location: MatchLocation::Site,
                pattern: vec![
                    PatternPart::Anchor,
                    PatternPart::Raw(site.to_string()),
                    PatternPart::Anchor,
                ],
            }],
            action: Action::Discard,
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rule {{")?;
        writeln!(f, "    Matches {{")?;

        for matching in &self.matches {
            writeln!(f, "        {matching},")?;
        }

        writeln!(f, "    }},")?;
        writeln!(f, "    Action({})", self.action)?;
        writeln!(f, "}};")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Boost(u64),
    Downrank(u64),
    Discard,
}

impl Default for Action {
    fn default() -> Self {
        Action::Boost(0)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Boost(amount) => write!(f, "Boost({amount})"),
            Action::Downrank(amount) => write!(f, "Downrank({amount})"),
            Action::Discard => write!(f, "Discard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchLocation {
    Site,
    Url,
    Domain,
    Title,
    Description,
    Content,
    Schema,
}

impl Display for MatchLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchLocation::Site => write!(f, "Site"),
            MatchLocation::Url => write!(f, "Url"),
            MatchLocation::Domain => write!(f, "Domain"),
            MatchLocation::Title => write!(f, "Title"),
            MatchLocation::Description => write!(f, "Description"),
            MatchLocation::Content => write!(f, "Content"),
            MatchLocation::Schema => write!(f, "Schema"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matching {
    pub location: MatchLocation,
    pub pattern: Vec<PatternPart>,
}

impl Matching {
    /// `*` matches any (possibly empty) substring and `|` anchors the
    /// pattern at the start or end of the haystack. A pattern without
    /// anchors matches anywhere.
    pub fn matches(&self, haystack: &str) -> bool {
        pattern_matches(&self.pattern, haystack)
    }
}

impl Display for Matching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(\"", self.location)?;
        for part in &self.pattern {
            write!(f, "{part}")?;
        }
        write!(f, "\")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    Raw(String),
    Wildcard,
    Anchor,
}

impl PatternPart {
    pub fn parse(pattern: &str) -> Result<Vec<PatternPart>> {
        if pattern.is_empty() {
            return Err(Error::Pattern {
                pattern: pattern.to_string(),
                reason: "pattern must not be empty".to_string(),
            });
        }

        let mut parts = Vec::new();
        let mut raw = String::new();

        for c in pattern.chars() {
            match c {
                '*' | '|' => {
                    if !raw.is_empty() {
                        parts.push(PatternPart::Raw(std::mem::take(&mut raw)));
                    }
                    parts.push(if c == '*' {
                        PatternPart::Wildcard
                    } else {
                        PatternPart::Anchor
                    });
                }
                _ => raw.push(c),
            }
        }

        if !raw.is_empty() {
            parts.push(PatternPart::Raw(raw));
        }

        for (i, part) in parts.iter().enumerate() {
            if matches!(part, PatternPart::Anchor) && i != 0 && i != parts.len() - 1 {
                return Err(Error::Pattern {
                    pattern: pattern.to_string(),
                    reason: "'|' is only valid at the start or end of a pattern".to_string(),
                });
            }
        }

        Ok(parts)
    }
}

impl Display for PatternPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternPart::Raw(s) => write!(f, "{s}"),
            PatternPart::Wildcard => write!(f, "*"),
            PatternPart::Anchor => write!(f, "|"),
        }
    }
}

fn pattern_matches(parts: &[PatternPart], haystack: &str) -> bool {
    let anchored_start = matches!(parts.first(), Some(PatternPart::Anchor));
    let anchored_end = parts.len() > 1 && matches!(parts.last(), Some(PatternPart::Anchor));

    let inner = &parts[anchored_start as usize..parts.len() - anchored_end as usize];

    let lead_wild = matches!(inner.first(), Some(PatternPart::Wildcard));
    let trail_wild = matches!(inner.last(), Some(PatternPart::Wildcard));

    let chunks: Vec<&str> = inner
        .iter()
        .filter_map(|part| match part {
            PatternPart::Raw(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    if chunks.is_empty() {
        // only anchors and/or wildcards left
        if inner.is_empty() {
            return haystack.is_empty();
        }
        return true;
    }

    let mut region = haystack;
    let mut idx = 0;

    if anchored_start && !lead_wild {
        if !region.starts_with(chunks[0]) {
            return false;
        }
        region = &region[chunks[0].len()..];
        idx = 1;
    }

    let suffix_chunk = anchored_end && !trail_wild;
    let end = if suffix_chunk {
        chunks.len() - 1
    } else {
        chunks.len()
    };

    for chunk in &chunks[idx.min(end)..end] {
        match region.find(chunk) {
            Some(i) => region = &region[i + chunk.len()..],
            None => return false,
        }
    }

    if suffix_chunk {
        let last = chunks[chunks.len() - 1];

        if idx > end {
            // single chunk consumed by the start anchor; pattern is exact
            return region.is_empty();
        }

        return region.ends_with(last);
    }

    true
}

/// Request-scoped liked/disliked/blocked site preferences.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteRankings {
    pub liked: Vec<String>,
    pub disliked: Vec<String>,
    pub blocked: Vec<String>,
}

impl SiteRankings {
    /// Deduplicated, sorted and with a site in at most one set. A site
    /// listed multiple times resolves blocked > disliked > liked so the
    /// result is deterministic regardless of input order.
    pub fn normalized(&self) -> SiteRankings {
        let blocked: BTreeSet<String> = self.blocked.iter().cloned().collect();
        let disliked: BTreeSet<String> = self
            .disliked
            .iter()
            .filter(|site| !blocked.contains(*site))
            .cloned()
            .collect();
        let liked: BTreeSet<String> = self
            .liked
            .iter()
            .filter(|site| !blocked.contains(*site) && !disliked.contains(*site))
            .cloned()
            .collect();

        SiteRankings {
            liked: liked.into_iter().collect(),
            disliked: disliked.into_iter().collect(),
            blocked: blocked.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty() && self.disliked.is_empty() && self.blocked.is_empty()
    }

    /// All sites mentioned in any of the three sets.
    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.liked
            .iter()
            .chain(self.disliked.iter())
            .chain(self.blocked.iter())
            .map(String::as_str)
            .unique()
    }
}
