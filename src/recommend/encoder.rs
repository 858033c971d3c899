//! Feature encoding of recommendation queries
//!
//! Layout: one-hot zone block, one-hot significance block, then the airport flag
//! as a passthrough column. Column order follows the schema vocabularies.

use std::collections::HashSet;

use super::schema::FeatureSchema;
use crate::models::Query;
use crate::models::query::is_unselected;
use crate::{RecommenderError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    zones: Vec<String>,
    significances: Vec<String>,
}

impl FeatureEncoder {
    /// Build the encoder from the vocabularies bundled with the index
    pub fn from_schema(schema: FeatureSchema) -> Result<Self> {
        check_vocabulary("zone", &schema.zone)?;
        check_vocabulary("significance", &schema.significance)?;
        Ok(Self {
            zones: schema.zone,
            significances: schema.significance,
        })
    }

    /// Length of an encoded vector
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.zones.len() + self.significances.len() + 1
    }

    #[must_use]
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    #[must_use]
    pub fn significances(&self) -> &[String] {
        &self.significances
    }

    /// Encode a query into the index feature space
    pub fn encode(&self, query: &Query) -> Result<Vec<f64>> {
        let zone = category_position("zone", &query.zone, &self.zones)?;
        let significance =
            category_position("significance", &query.significance, &self.significances)?;

        let mut encoded = vec![0.0; self.dimension()];
        encoded[zone] = 1.0;
        encoded[self.zones.len() + significance] = 1.0;
        encoded[self.dimension() - 1] = query.airport_value();
        Ok(encoded)
    }
}

fn check_vocabulary(field: &str, categories: &[String]) -> Result<()> {
    if categories.is_empty() {
        return Err(RecommenderError::config(format!(
            "Index schema has no {field} categories"
        )));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = categories.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(RecommenderError::config(format!(
            "Index schema lists {field} category '{duplicate}' twice"
        )));
    }
    Ok(())
}

fn category_position(field: &str, value: &str, categories: &[String]) -> Result<usize> {
    if is_unselected(value) {
        return Err(RecommenderError::validation(format!(
            "Please select a {field} before continuing"
        )));
    }

    let value = value.trim();
    categories
        .iter()
        .position(|c| c == value)
        .ok_or_else(|| {
            RecommenderError::validation(format!(
                "Unknown {field} '{value}'. Must be one of: {}",
                categories.join(", ")
            ))
        })
}
