use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::DEFAULT_THRESHOLD;

/// One selectable value within a filter type.
///
/// The `key` is what callers get back in a query result; the
/// `description` is free text used only for embedding. An empty
/// description is accepted — it degrades matching quality but is not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub key: String,
    pub description: String,
}

/// A named axis of categorization (e.g. `"diet"`) with its option
/// vocabulary in declaration order.
///
/// Declaration order is load-bearing: when two options tie exactly on
/// similarity, the first-declared one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterType {
    pub name: String,
    pub options: Vec<FilterOption>,
}

/// An immutable registration record: filter types, their option
/// vocabularies, and a schema-wide acceptance threshold.
///
/// Construction is the only validation point; once built, a schema is
/// never mutated. There is no per-filter-type threshold override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSchema {
    filter_types: Vec<FilterType>,
    threshold: f32,
}

impl FilterSchema {
    /// Validate and build a schema. `threshold` defaults to
    /// [`DEFAULT_THRESHOLD`] when `None`.
    ///
    /// Rejected with [`ExtractError::InvalidSchema`]: an empty
    /// filter-type set, a filter type with no options, duplicate option
    /// keys within a filter type, and a non-finite threshold. Any finite
    /// threshold is accepted; meaningful values lie in [-1, 1] on the
    /// cosine scale.
    pub fn new(filter_types: Vec<FilterType>, threshold: Option<f32>) -> Result<Self> {
        let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !threshold.is_finite() {
            return Err(ExtractError::InvalidSchema(format!(
                "threshold must be finite, got {threshold}"
            )));
        }
        if filter_types.is_empty() {
            return Err(ExtractError::InvalidSchema(
                "schema must declare at least one filter type".into(),
            ));
        }
        for filter_type in &filter_types {
            if filter_type.options.is_empty() {
                return Err(ExtractError::InvalidSchema(format!(
                    "filter type '{}' has no options",
                    filter_type.name
                )));
            }
            let mut seen = HashSet::with_capacity(filter_type.options.len());
            for option in &filter_type.options {
                if !seen.insert(option.key.as_str()) {
                    return Err(ExtractError::InvalidSchema(format!(
                        "filter type '{}' declares option '{}' more than once",
                        filter_type.name, option.key
                    )));
                }
            }
        }
        Ok(Self {
            filter_types,
            threshold,
        })
    }

    pub fn builder() -> FilterSchemaBuilder {
        FilterSchemaBuilder::default()
    }

    /// Filter types in declaration order.
    pub fn filter_types(&self) -> &[FilterType] {
        &self.filter_types
    }

    /// Schema-wide acceptance threshold on the cosine scale.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

/// Convenience builder mirroring the registration payload shape.
#[derive(Debug, Default)]
pub struct FilterSchemaBuilder {
    filter_types: Vec<FilterType>,
    threshold: Option<f32>,
}

impl FilterSchemaBuilder {
    /// Add a filter type with `(key, description)` options in declaration
    /// order.
    pub fn filter_type<N, K, D>(
        mut self,
        name: N,
        options: impl IntoIterator<Item = (K, D)>,
    ) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        D: Into<String>,
    {
        self.filter_types.push(FilterType {
            name: name.into(),
            options: options
                .into_iter()
                .map(|(key, description)| FilterOption {
                    key: key.into(),
                    description: description.into(),
                })
                .collect(),
        });
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<FilterSchema> {
        FilterSchema::new(self.filter_types, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diet_schema() -> FilterSchemaBuilder {
        FilterSchema::builder().filter_type(
            "diet",
            [
                ("Vegan", "food with no animal products or dairy"),
                ("Vegetarian", "no meat, but may include dairy"),
            ],
        )
    }

    #[test]
    fn builds_with_default_threshold() {
        let schema = diet_schema().build().unwrap();
        assert_eq!(schema.threshold(), crate::DEFAULT_THRESHOLD);
        assert_eq!(schema.filter_types().len(), 1);
        assert_eq!(schema.filter_types()[0].options.len(), 2);
    }

    #[test]
    fn builds_with_explicit_threshold() {
        let schema = diet_schema().threshold(0.7).build().unwrap();
        assert_eq!(schema.threshold(), 0.7);
    }

    #[test]
    fn preserves_option_declaration_order() {
        let schema = diet_schema().build().unwrap();
        let keys: Vec<&str> = schema.filter_types()[0]
            .options
            .iter()
            .map(|o| o.key.as_str())
            .collect();
        assert_eq!(keys, ["Vegan", "Vegetarian"]);
    }

    #[test]
    fn rejects_empty_filter_type_set() {
        let err = FilterSchema::new(Vec::new(), None).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSchema(_)));
    }

    #[test]
    fn rejects_filter_type_without_options() {
        let err = FilterSchema::builder()
            .filter_type("diet", Vec::<(String, String)>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("has no options"));
    }

    #[test]
    fn rejects_duplicate_option_keys() {
        let err = FilterSchema::builder()
            .filter_type("diet", [("Vegan", "a"), ("Vegan", "b")])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn rejects_nan_threshold() {
        let err = diet_schema().threshold(f32::NAN).build().unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn rejects_infinite_threshold() {
        let err = diet_schema().threshold(f32::INFINITY).build().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSchema(_)));
    }

    #[test]
    fn accepts_negative_threshold() {
        // Cosine similarity ranges over [-1, 1]; negative thresholds are
        // unusual but representable.
        let schema = diet_schema().threshold(-0.5).build().unwrap();
        assert_eq!(schema.threshold(), -0.5);
    }

    #[test]
    fn accepts_empty_description() {
        let schema = FilterSchema::builder()
            .filter_type("diet", [("Vegan", "")])
            .build()
            .unwrap();
        assert_eq!(schema.filter_types()[0].options[0].description, "");
    }

    #[test]
    fn duplicate_keys_allowed_across_filter_types() {
        let schema = FilterSchema::builder()
            .filter_type("diet", [("Other", "anything else")])
            .filter_type("price", [("Other", "unspecified budget")])
            .build()
            .unwrap();
        assert_eq!(schema.filter_types().len(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let schema = diet_schema().threshold(0.6).build().unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let back: FilterSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }
}
