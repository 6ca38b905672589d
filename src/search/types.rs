use serde::Serialize;

use crate::catalog::CatalogRecord;
use crate::constants::DEFAULT_TOP_K;
use crate::payload::finite_or_null;

/// Catalog columns carried on a result. Empty cells serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetails {
    pub category: Option<String>,
    #[serde(rename = "subCategory")]
    pub sub_category: Option<String>,
    #[serde(rename = "articleType")]
    pub article_type: Option<String>,
    #[serde(rename = "baseColor")]
    pub base_color: Option<String>,
    pub gender: Option<String>,
    pub usage: Option<String>,
}

impl From<&CatalogRecord> for ProductDetails {
    fn from(record: &CatalogRecord) -> Self {
        Self {
            category: record.category.clone(),
            sub_category: record.sub_category.clone(),
            article_type: record.article_type.clone(),
            base_color: record.base_color.clone(),
            gender: record.gender.clone(),
            usage: record.usage.clone(),
        }
    }
}

/// One retrieved index slot.
///
/// `details` is `None` for a degraded slot whose catalog row was missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub details: Option<ProductDetails>,
    /// `1 - squared_l2_distance`; may be negative.
    #[serde(serialize_with = "finite_or_null")]
    pub similarity: f32,
    pub image: String,
}

impl CandidateResult {
    pub fn from_record(record: &CatalogRecord, similarity: f32) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            details: Some(ProductDetails::from(record)),
            similarity,
            image: image_file(&record.id),
        }
    }

    /// Placeholder for a slot with no catalog row.
    pub fn degraded(id: impl Into<String>, similarity: f32) -> Self {
        let id = id.into();
        Self {
            name: format!("Product {id}"),
            image: image_file(&id),
            id,
            details: None,
            similarity,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.details.is_none()
    }

    pub fn base_color(&self) -> Option<&str> {
        self.details.as_ref()?.base_color.as_deref()
    }

    pub fn article_type(&self) -> Option<&str> {
        self.details.as_ref()?.article_type.as_deref()
    }
}

fn image_file(id: &str) -> String {
    format!("{id}.jpg")
}

/// Per-request knobs shared by the three search modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub top_k: usize,
    /// Caller-supplied color labels; free-form, canonicalized before use.
    pub dominant_colors: Vec<String>,
    /// Let the rotation fallback admit an image the direct check rejected.
    pub rotation_check: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            dominant_colors: Vec::new(),
            rotation_check: false,
        }
    }
}

impl SearchOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.dominant_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rotation_check(mut self, enabled: bool) -> Self {
        self.rotation_check = enabled;
        self
    }
}
