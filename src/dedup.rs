//! Deduplication
//!
//! Offers seen in several emails are collapsed into one record. Two candidates
//! are the same offer when they share a promo code (ignoring case), or when
//! neither has a code and they share merchant and discount text (ignoring case).
//!
//! Grouping is keyed, not a pairwise scan, so the groups do not depend on the
//! order of the batch. Order only decides which field values a merged record keeps
//! and where it appears: at the position of its earliest member.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::offers::OfferCandidate;

/// The identity of an offer for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OfferKey {
    /// Offers with a code are identified by the code alone
    Code(String),

    /// Offers without a code are identified by merchant and discount
    Listing {
        /// Lowercased merchant name
        merchant: String,

        /// Lowercased discount text
        discount: String,
    },
}

impl OfferKey {
    /// The key of a candidate.
    pub fn of(candidate: &OfferCandidate) -> Self {
        match &candidate.code {
            Some(code) => Self::Code(code.as_str().to_uppercase()),
            None => Self::Listing {
                merchant: candidate.merchant.trim().to_lowercase(),
                discount: candidate.discount.trim().to_lowercase(),
            },
        }
    }
}

impl fmt::Display for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "code {code}"),
            Self::Listing { merchant, discount } => write!(f, "{merchant} / {discount}"),
        }
    }
}

/// Collapses duplicate candidates across a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Collapse duplicates, keeping groups in order of first appearance.
    pub fn deduplicate(&self, candidates: Vec<OfferCandidate>) -> Vec<OfferCandidate> {
        let mut positions: FxHashMap<OfferKey, usize> = FxHashMap::default();
        let mut groups: Vec<(OfferKey, Vec<OfferCandidate>)> = Vec::new();

        for candidate in candidates {
            let key = OfferKey::of(&candidate);

            if let Some(group) = positions
                .get(&key)
                .and_then(|&position| groups.get_mut(position))
            {
                group.1.push(candidate);
                continue;
            }

            positions.insert(key.clone(), groups.len());
            groups.push((key, vec![candidate]));
        }

        groups
            .into_iter()
            .filter_map(|(key, group)| {
                if group.len() > 1 {
                    debug!(%key, duplicates = group.len() - 1, "merged duplicate offers");
                }

                merge(group)
            })
            .collect()
    }
}

/// Merge a group of duplicates, in order of appearance, into one record.
///
/// The earliest record keeps its context; merchant, category, discount and
/// expiration are taken from the earliest member that has a meaningful value.
fn merge(group: Vec<OfferCandidate>) -> Option<OfferCandidate> {
    let mut members = group.into_iter();
    let mut merged = members.next()?;

    for other in members {
        let other_has_discount = !other.has_fallback_discount();

        if merged.code.is_none() {
            merged.code = other.code;
        }

        if merged.merchant.trim().is_empty() {
            merged.merchant = other.merchant;
        }

        if merged.category.is_other() {
            merged.category = other.category;
        }

        if merged.has_fallback_discount() && other_has_discount {
            merged.discount = other.discount;
        }

        if merged.expiration_text.is_none() {
            merged.expiration_text = other.expiration_text;
        }
    }

    Some(merged)
}
