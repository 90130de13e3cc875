//! Categorisation

use crate::{
    config::Taxonomy,
    offers::{Category, OfferCandidate},
};

/// Assigns taxonomy categories by counting keyword hits.
///
/// Keywords are matched case-insensitively as substrings of the merchant name,
/// the subject line and the discount text. The category with the most hits wins,
/// ties go to the category declared first, and no hits at all gives "Other".
#[derive(Debug, Clone)]
pub struct Categorizer {
    categories: Vec<(Category, Vec<String>)>,
}

impl Categorizer {
    /// Build a categorizer for a taxonomy.
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let categories = taxonomy
            .categories
            .iter()
            .map(|rule| {
                let keywords = rule
                    .keywords
                    .iter()
                    .map(|keyword| keyword.trim().to_lowercase())
                    .filter(|keyword| !keyword.is_empty())
                    .collect();

                (Category::new(rule.name.trim()), keywords)
            })
            .collect();

        Self { categories }
    }

    /// Set the category of a candidate.
    pub fn assign(&self, candidate: &mut OfferCandidate) {
        candidate.category = self.categorize(candidate);
    }

    /// Category for a candidate.
    pub fn categorize(&self, candidate: &OfferCandidate) -> Category {
        self.categorize_text(
            &candidate.merchant,
            &candidate.source_subject,
            &candidate.discount,
        )
    }

    /// Category for a merchant, subject and discount text.
    pub fn categorize_text(&self, merchant: &str, subject: &str, discount: &str) -> Category {
        // Fields are kept on separate lines so a keyword never spans two of them.
        let haystack = [merchant, subject, discount].join("\n").to_lowercase();

        let mut best: Option<(&Category, usize)> = None;

        for (category, keywords) in &self.categories {
            let hits = keywords
                .iter()
                .map(|keyword| haystack.matches(keyword.as_str()).count())
                .sum();

            if hits > best.map_or(0, |(_, best_hits)| best_hits) {
                best = Some((category, hits));
            }
        }

        best.map_or_else(Category::other, |(category, _)| category.clone())
    }
}
