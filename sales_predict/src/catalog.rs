//! Token catalog recovered from the trained feature list
//!
//! The model sees a categorical attribute only through its one-hot dummy
//! columns, so the set of tokens it was trained on is recoverable from
//! the feature list alone: a column named `<Attribute>_<token>`
//! contributes `<token>` to that attribute's vocabulary. The catalog is
//! built once at startup and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

/// Categorical attributes encoded during training, in wire order
pub const CATEGORICAL_ATTRIBUTES: [&str; 4] = ["Category", "Subcategory", "City", "Region"];

/// Read-only vocabulary of training-time tokens per categorical attribute
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
    tokens: BTreeMap<String, BTreeSet<String>>,
}

impl TokenCatalog {
    /// Build the catalog from the trained feature list's column names.
    ///
    /// Columns that match no known attribute prefix (the numeric
    /// features) are ignored.
    pub fn from_feature_list<S: AsRef<str>>(feature_list: &[S]) -> Self {
        let mut tokens: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for name in feature_list {
            let name = name.as_ref();
            for attribute in CATEGORICAL_ATTRIBUTES {
                if let Some(token) = name.strip_prefix(attribute).and_then(|rest| {
                    rest.strip_prefix('_')
                }) {
                    if !token.is_empty() {
                        tokens
                            .entry(attribute.to_string())
                            .or_default()
                            .insert(token.to_string());
                    }
                    break;
                }
            }
        }

        Self { tokens }
    }

    /// Tokens seen at training time for an attribute, in deterministic
    /// (lexicographic) order. Empty when the attribute had no dummy
    /// columns.
    pub fn tokens<'a>(&'a self, attribute: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.tokens
            .get(attribute)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether the attribute has any vocabulary at all
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.tokens
            .get(attribute)
            .map(|set| !set.is_empty())
            .unwrap_or(false)
    }

    /// Total number of tokens across all attributes
    pub fn len(&self) -> usize {
        self.tokens.values().map(BTreeSet::len).sum()
    }

    /// Whether the catalog holds no tokens at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_feature_list() {
        let features = [
            "year",
            "month",
            "sales_lag_1",
            "Category_Electronics",
            "Category_Furniture",
            "Subcategory_Phones",
            "City_Dhaka",
            "Region_Central",
        ];
        let catalog = TokenCatalog::from_feature_list(&features);

        let categories: Vec<&str> = catalog.tokens("Category").collect();
        assert_eq!(categories, vec!["Electronics", "Furniture"]);

        let subcategories: Vec<&str> = catalog.tokens("Subcategory").collect();
        assert_eq!(subcategories, vec!["Phones"]);

        assert!(catalog.has_attribute("City"));
        assert!(catalog.has_attribute("Region"));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_numeric_columns_are_ignored() {
        let features = ["year", "month", "day", "weekday", "is_weekend"];
        let catalog = TokenCatalog::from_feature_list(&features);
        assert!(catalog.is_empty());
        assert!(!catalog.has_attribute("Category"));
    }

    #[test]
    fn test_subcategory_does_not_leak_into_category() {
        let features = ["Subcategory_Phones"];
        let catalog = TokenCatalog::from_feature_list(&features);
        assert_eq!(catalog.tokens("Category").count(), 0);
        assert_eq!(catalog.tokens("Subcategory").count(), 1);
    }
}
