//! Categorical token normalization against the trained vocabulary
//!
//! Client-entered attribute values are free text and will not always
//! match the training vocabulary verbatim. The model can only see a
//! category through its one-hot dummy column, so an unmapped token is
//! invisible to it (all zeros for that attribute). Normalization makes
//! the mapping explicit: exact case-insensitive match first, then a
//! similarity search gated by a tunable cutoff, then an explicit
//! no-match. This function never fails.

use crate::catalog::TokenCatalog;
use log::debug;
use predict_math::text::similarity_ratio;

/// Default similarity cutoff for accepting a fuzzy match
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.55;

/// Outcome of normalizing one attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum TokenMatch {
    /// The trimmed value matched a catalog token case-insensitively
    Exact(String),
    /// A catalog token cleared the similarity cutoff
    Fuzzy {
        token: String,
        score: f64,
    },
    /// Nothing in the catalog resembles the value
    NoMatch,
}

impl TokenMatch {
    /// The resolved catalog token, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            TokenMatch::Exact(token) => Some(token),
            TokenMatch::Fuzzy { token, .. } => Some(token),
            TokenMatch::NoMatch => None,
        }
    }

    /// Whether normalization found a usable token
    pub fn is_match(&self) -> bool {
        !matches!(self, TokenMatch::NoMatch)
    }
}

/// Map a free-text value onto the catalog vocabulary for one attribute.
///
/// An exact case-insensitive match always wins over a fuzzy one. The
/// fuzzy search returns the best-scoring token at or above `cutoff`;
/// ties resolve to the lexicographically first token because the catalog
/// iterates in sorted order.
pub fn normalize_token(
    raw: &str,
    catalog: &TokenCatalog,
    attribute: &str,
    cutoff: f64,
) -> TokenMatch {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return TokenMatch::NoMatch;
    }

    let mut best: Option<(&str, f64)> = None;
    for token in catalog.tokens(attribute) {
        let candidate = token.to_lowercase();
        if candidate == needle {
            return TokenMatch::Exact(token.to_string());
        }

        let score = similarity_ratio(&needle, &candidate);
        if score >= cutoff {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((token, score)),
            }
        }
    }

    match best {
        Some((token, score)) => TokenMatch::Fuzzy {
            token: token.to_string(),
            score,
        },
        None => {
            debug!(
                "no catalog token for {}={:?} cleared cutoff {}",
                attribute, raw, cutoff
            );
            TokenMatch::NoMatch
        }
    }
}
