//! The catalog's product record and its value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductId, ValueObject};

use crate::category::Category;
use crate::currency::{format_inr, round_cents, usd_to_inr};

/// Size options given to products created without explicit sizes.
pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

/// Price in INR, two decimal places, finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Price rounded to two decimals.
    pub fn new(amount: f64) -> DomainResult<Self> {
        Self::validate(amount)?;
        Ok(Self(round_cents(amount)))
    }

    fn validate(amount: f64) -> DomainResult<()> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        Ok(())
    }

    /// Price from a USD amount, converted with the fixed seed factor.
    pub fn from_usd(usd: f64) -> DomainResult<Self> {
        if !usd.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        Self::new(usd_to_inr(usd))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    /// Used when loading snapshots: validated, but kept exactly as stored.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::validate(value)?;
        Ok(Self(value))
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&format_inr(self.0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Reference to an image or video shown with a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    #[serde(default)]
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Image,
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Video,
        }
    }
}

impl ValueObject for MediaRef {}

/// A catalog product, in the shape persisted to the storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub price: Price,
    pub in_stock: bool,
    pub sizes: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Candidate for [`crate::CatalogStore::add_product`].
///
/// Identifier, stock flag and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub price: Price,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub media: Option<Vec<MediaRef>>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: Category, price: Price) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category,
            price,
            sizes: None,
            media: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = Some(sizes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_media(mut self, media: Vec<MediaRef>) -> Self {
        self.media = Some(media);
        self
    }

    /// Build the stored record: stock forced on, defaults filled, both
    /// timestamps set to `now`.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            in_stock: true,
            sizes: self
                .sizes
                .unwrap_or_else(|| DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()),
            media: self.media.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}
