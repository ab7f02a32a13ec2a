//! Seed datasets and their decoding into strict [`Product`]s.
//!
//! Seed records are quoted in USD and are looser than stored products: ids may
//! be numbers or strings, prices may be numbers or formatted text, and most
//! fields are optional. Decoding either yields a valid product or a
//! [`SeedError`]; malformed records are never coerced.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use storefront_core::{DomainError, ProductId};

use crate::category::Category;
use crate::currency::parse_price_text;
use crate::product::{MediaRef, Price, Product};

const WATCHES_JSON: &str = include_str!("../seed/watches.json");
const SHOES_JSON: &str = include_str!("../seed/shoes.json");
const BAGS_JSON: &str = include_str!("../seed/bags.json");
const CLOTHING_JSON: &str = include_str!("../seed/clothing.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to parse {dataset} seed data: {source}")]
    Json {
        dataset: Category,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed product {id}: unparseable price {raw:?}")]
    InvalidPrice { id: String, raw: String },

    #[error("seed product {id}: category {found} does not belong in the {expected} dataset")]
    CategoryMismatch {
        id: String,
        expected: Category,
        found: Category,
    },

    #[error("seed product {id}: updatedAt {updated_at} precedes createdAt {created_at}")]
    TimestampOrder {
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },

    #[error("seed product id {0} appears more than once")]
    DuplicateId(ProductId),

    #[error("seed product {id}: {source}")]
    Domain {
        id: String,
        #[source]
        source: DomainError,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl core::fmt::Display for RawId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

fn default_in_stock() -> bool {
    true
}

/// One record as it appears in a seed dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: RawId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to the dataset's category when absent.
    #[serde(default)]
    pub category: Option<Category>,
    pub price: RawPrice,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawProduct {
    /// Decode into a stored product.
    ///
    /// Missing timestamps default to `now`, except that a missing `createdAt`
    /// never lands after an explicit `updatedAt` and a missing `updatedAt`
    /// never lands before `createdAt`. Explicit timestamps out of order are an
    /// error. The USD price is converted to INR.
    pub fn decode(self, dataset: Category, now: DateTime<Utc>) -> Result<Product, SeedError> {
        let raw_id = self.id.to_string();
        let id = match self.id {
            RawId::Number(n) => ProductId::from_number(n),
            RawId::Text(s) => s.parse().map_err(|source| SeedError::Domain {
                id: raw_id.clone(),
                source,
            })?,
        };

        let category = self.category.unwrap_or(dataset);
        if category != dataset {
            return Err(SeedError::CategoryMismatch {
                id: raw_id,
                expected: dataset,
                found: category,
            });
        }

        let usd = match self.price {
            RawPrice::Number(n) => n,
            RawPrice::Text(text) => {
                parse_price_text(&text).ok_or_else(|| SeedError::InvalidPrice {
                    id: raw_id.clone(),
                    raw: text.clone(),
                })?
            }
        };
        let price = Price::from_usd(usd).map_err(|source| SeedError::Domain {
            id: raw_id.clone(),
            source,
        })?;

        if self.name.trim().is_empty() {
            return Err(SeedError::Domain {
                id: raw_id,
                source: DomainError::validation("name cannot be empty"),
            });
        }

        let (created_at, updated_at) = match (self.created_at, self.updated_at) {
            (Some(created_at), Some(updated_at)) if updated_at < created_at => {
                return Err(SeedError::TimestampOrder {
                    id: raw_id,
                    created_at,
                    updated_at,
                });
            }
            (Some(created_at), Some(updated_at)) => (created_at, updated_at),
            (Some(created_at), None) => (created_at, now.max(created_at)),
            (None, Some(updated_at)) => (now.min(updated_at), updated_at),
            (None, None) => (now, now),
        };

        Ok(Product {
            id,
            name: self.name,
            description: self.description,
            category,
            price,
            in_stock: self.in_stock,
            sizes: self.sizes,
            media: self.media,
            created_at,
            updated_at,
        })
    }
}

/// Raw records for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSet {
    pub category: Category,
    pub records: Vec<RawProduct>,
}

/// The static datasets a catalog is seeded from when no snapshot exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    sets: Vec<SeedSet>,
}

impl SeedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four datasets shipped with the crate (watches, shoes, bags, clothing).
    pub fn builtin() -> Result<Self, SeedError> {
        Self::new()
            .with_json(Category::Watches, WATCHES_JSON)?
            .with_json(Category::Shoes, SHOES_JSON)?
            .with_json(Category::Bags, BAGS_JSON)?
            .with_json(Category::Clothing, CLOTHING_JSON)
    }

    /// Append a dataset given as a JSON array of raw records.
    pub fn with_json(mut self, category: Category, json: &str) -> Result<Self, SeedError> {
        let records = serde_json::from_str(json).map_err(|source| SeedError::Json {
            dataset: category,
            source,
        })?;
        self.sets.push(SeedSet { category, records });
        Ok(self)
    }

    /// Decode every dataset, concatenated in insertion order.
    pub fn into_products(self, now: DateTime<Utc>) -> Result<Vec<Product>, SeedError> {
        let mut seen = HashSet::new();
        let mut products = Vec::new();

        for set in self.sets {
            for record in set.records {
                let product = record.decode(set.category, now)?;
                if !seen.insert(product.id.clone()) {
                    return Err(SeedError::DuplicateId(product.id));
                }
                products.push(product);
            }
        }

        tracing::debug!(count = products.len(), "decoded seed catalog");
        Ok(products)
    }
}
