//! Wire model for the SRS level details endpoint.
//!
//! Only the fields the exporter reads are modelled. Every field is optional
//! on the wire; absent collections decode as empty and absent strings as
//! empty strings. Ids arrive as numbers or strings depending on the
//! endpoint version, so they are normalized to strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Path of the endpoint, relative to the API base URL.
pub const SRS_LEVEL_DETAILS_PATH: &str = "/api/frontend/user_stats/srs_level_details";

/// One decoded page of the SRS level details endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrsPage {
    /// Paged reviews and their side-loaded vocabulary.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Reviews,
}

/// The `reviews` object: review records plus the items they point at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reviews {
    /// Review records for this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Review>,
    /// Side-loaded vocabulary referenced by `data`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub included: Vec<IncludedItem>,
}

/// A single review record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
    /// Review attributes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: ReviewAttributes,
}

/// Attributes of a review record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewAttributes {
    /// Id of the reviewed item, matched against [`IncludedItem::id`].
    #[serde(default, deserialize_with = "string_id")]
    pub reviewable_id: Option<String>,
}

/// A side-loaded vocabulary item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludedItem {
    /// Item id.
    #[serde(default, deserialize_with = "string_id")]
    pub id: Option<String>,
    /// Item attributes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: VocabAttributes,
}

/// Attributes of a vocabulary item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabAttributes {
    /// The term itself.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// English meaning.
    #[serde(default, deserialize_with = "null_as_default")]
    pub meaning: String,
}

impl SrsPage {
    /// A page with neither reviews nor included items ends a level.
    pub fn is_empty(&self) -> bool {
        self.reviews.data.is_empty() && self.reviews.included.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(number_id(&n)),
        _ => None,
    })
}

/// Renders a numeric id the way the frontend stringifies it: whole floats
/// lose their fractional part, so `42.0` and `42` name the same item.
fn number_id(n: &serde_json::Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.is_finite()
        && f.fract() == 0.0
        && f.abs() < 9.007_199_254_740_992e15
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}
