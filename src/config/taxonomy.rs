//! Category Taxonomy

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::{config::ConfigError, offers::Category};

/// One category and the keywords that signal it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRule {
    /// Category name
    pub name: String,

    /// Keywords matched case-insensitively as substrings
    pub keywords: Vec<String>,
}

/// Ordered mapping of category name to keyword signals.
///
/// Declaration order is significant: it breaks ties between equally scored categories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Taxonomy {
    /// Categories in declaration order
    pub categories: Vec<CategoryRule>,
}

impl Taxonomy {
    /// Build a taxonomy from `(name, keywords)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        Self {
            categories: pairs
                .into_iter()
                .map(|(name, keywords)| CategoryRule {
                    name: name.to_string(),
                    keywords: keywords.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    /// Category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|rule| Category::new(&rule.name))
    }

    /// Check the taxonomy is usable for categorisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the taxonomy is empty, a category name is blank or
    /// repeated, or a category has no non-blank keywords.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::EmptyTaxonomy);
        }

        let mut seen = FxHashSet::default();

        for rule in &self.categories {
            let name = rule.name.trim();

            if name.is_empty() {
                return Err(ConfigError::BlankCategoryName);
            }

            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateCategory(name.to_string()));
            }

            if rule.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
                return Err(ConfigError::CategoryWithoutKeywords(name.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_preserves_declaration_order() -> Result<(), serde_norway::Error> {
        let yaml = r"
categories:
  - name: Travel
    keywords: [flight, hotel]
  - name: Food
    keywords: [pizza]
";
        let taxonomy: Taxonomy = serde_norway::from_str(yaml)?;
        let names: Vec<String> = taxonomy.names().map(|c| c.as_str().to_owned()).collect();

        assert_eq!(names, ["Travel", "Food"]);

        Ok(())
    }

    #[test]
    fn empty_taxonomy_is_rejected() {
        let taxonomy = Taxonomy { categories: vec![] };

        assert!(matches!(taxonomy.validate(), Err(ConfigError::EmptyTaxonomy)));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let taxonomy = Taxonomy::from_pairs([
            ("Travel", &["flight"][..]),
            ("travel", &["hotel"][..]),
        ]);

        assert!(matches!(
            taxonomy.validate(),
            Err(ConfigError::DuplicateCategory(name)) if name == "travel"
        ));
    }

    #[test]
    fn category_without_keywords_is_rejected() {
        let taxonomy = Taxonomy::from_pairs([("Travel", &[" "][..])]);

        assert!(matches!(
            taxonomy.validate(),
            Err(ConfigError::CategoryWithoutKeywords(name)) if name == "Travel"
        ));
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let taxonomy = Taxonomy::from_pairs([("  ", &["flight"][..])]);

        assert!(matches!(taxonomy.validate(), Err(ConfigError::BlankCategoryName)));
    }
}
