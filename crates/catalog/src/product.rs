//! Catalog product records.

use serde::{Deserialize, Serialize};

use storefront_core::{DomainResult, Money};

/// Opaque product identifier (e.g. `OLJCESPC7Z`).
///
/// Compared exactly: case-sensitive, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A catalog product. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    /// Image path or URL; never checked for existence.
    picture: String,
    #[serde(alias = "price_usd", alias = "priceUsd")]
    price: Money,
    categories: Vec<String>,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        picture: impl Into<String>,
        price: Money,
        categories: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            picture: picture.into(),
            price,
            categories,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn picture(&self) -> &str {
        &self.picture
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Structural checks applied to every record of a snapshot.
    ///
    /// Only the price is checked. Empty ids and blank text fields are data,
    /// not errors.
    pub fn validate(&self) -> DomainResult<()> {
        self.price.validate()
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}
