use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Maximum number of additional images kept on a record.
pub const MAX_IMAGES: usize = 10;
/// Maximum promotion text length.
pub const MAX_PROMOTION_LEN: usize = 500;
/// Maximum detailed description length.
pub const MAX_DESCRIPTION_LEN: usize = 5000;
/// Maximum length of a single feature or included item.
pub const MAX_FEATURE_LEN: usize = 200;

/// One unit of work: a page URL plus the catalog identifier it enriches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub url: String,
    pub product_id: String,
}

impl Job {
    pub fn new(url: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            product_id: product_id.into(),
        }
    }
}

/// The enriched product entity produced for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub sku: Option<String>,
    pub original_price: Option<f64>,
    pub sale_price: Option<f64>,
    /// Integer percentage in 0..=100. Derived from the two prices when the
    /// page does not embed promotional metadata.
    pub discount_percentage: Option<u8>,
    pub promotion_text: Option<String>,
    pub stock_quantity: Option<u32>,
    pub detailed_description: Option<String>,
    pub features: Vec<String>,
    pub included_items: Vec<String>,
    pub specifications: std::collections::BTreeMap<String, String>,
    /// Absolute image URLs, capped at [`MAX_IMAGES`].
    pub additional_images: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(product_id: impl Into<String>) -> Self {
        let product_id = product_id.into();
        Self {
            sku: Some(product_id.clone()),
            product_id,
            original_price: None,
            sale_price: None,
            discount_percentage: None,
            promotion_text: None,
            stock_quantity: None,
            detailed_description: None,
            features: Vec::new(),
            included_items: Vec::new(),
            specifications: std::collections::BTreeMap::new(),
            additional_images: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Enforce pricing consistency and field bounds.
    ///
    /// Rejects a sale price above the original price, derives the discount
    /// percentage when both prices are present and none was extracted, and
    /// truncates the image list to [`MAX_IMAGES`].
    pub fn validated(mut self) -> Result<Self, ScrapeError> {
        if let Some(orig) = self.original_price {
            if orig <= 0.0 {
                return Err(ScrapeError::Validation(format!(
                    "original_price must be positive, got {orig}"
                )));
            }
        }
        if let Some(sale) = self.sale_price {
            if sale <= 0.0 {
                return Err(ScrapeError::Validation(format!(
                    "sale_price must be positive, got {sale}"
                )));
            }
        }
        if let (Some(orig), Some(sale)) = (self.original_price, self.sale_price) {
            if sale > orig {
                return Err(ScrapeError::Validation(format!(
                    "sale price {sale} cannot exceed original price {orig}"
                )));
            }
            if self.discount_percentage.is_none() {
                let discount = ((orig - sale) / orig * 100.0).round();
                self.discount_percentage = Some(discount as u8);
            }
        }
        if let Some(pct) = self.discount_percentage {
            if pct > 100 {
                return Err(ScrapeError::Validation(format!(
                    "discount_percentage must be 0..=100, got {pct}"
                )));
            }
        }
        if let Some(promo) = &self.promotion_text {
            if promo.chars().count() > MAX_PROMOTION_LEN {
                return Err(ScrapeError::Validation("promotion_text too long".into()));
            }
        }
        if let Some(desc) = &self.detailed_description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(ScrapeError::Validation(
                    "detailed_description too long".into(),
                ));
            }
        }
        for feature in self.features.iter().chain(self.included_items.iter()) {
            if feature.chars().count() > MAX_FEATURE_LEN {
                return Err(ScrapeError::Validation("feature entry too long".into()));
            }
        }
        if self.additional_images.len() > MAX_IMAGES {
            self.additional_images.truncate(MAX_IMAGES);
        }
        Ok(self)
    }

    /// The price a buyer actually pays: sale price when present, else original.
    pub fn effective_price(&self) -> Option<f64> {
        self.sale_price.or(self.original_price)
    }

    /// True when both prices are present and the sale price is strictly lower.
    pub fn has_discount(&self) -> bool {
        matches!(
            (self.original_price, self.sale_price),
            (Some(orig), Some(sale)) if sale < orig
        )
    }
}

/// A cached record with TTL expiry. Written once, never mutated; a fresh
/// extraction replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record: ProductRecord,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(record: ProductRecord, ttl: std::time::Duration) -> Self {
        let created_at = Utc::now();
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(3600));
        Self {
            record,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
