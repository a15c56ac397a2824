// src/record.rs
//! # Business Record Model
//!
//! The denormalized record a places lookup returns for one business, plus
//! the caller's query. Every field is optional: records arrive in whatever
//! state the upstream service left them, and the scoring core degrades
//! missing data to zero contribution instead of erroring.
//!
//! Presence predicates follow the upstream payload's conventions: an empty
//! string, a zero rating, a zero review count or an empty hours object all
//! count as absent.

use serde::{Deserialize, Serialize};

/// One business as returned by a places lookup. Unknown payload fields are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub current_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub region_validation: Option<RegionValidation>,
}

/// Opening-hours payload. Only presence matters to scoring; the periods
/// keep their raw JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub periods: Vec<serde_json::Value>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
    #[serde(default)]
    pub open_now: Option<bool>,
}

impl OpeningHours {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.weekday_text.is_empty() && self.open_now.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Verdict of the external region validator, attached to the record by the
/// host before scoring. The core only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionValidation {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub actual_region: Option<String>,
}

impl BusinessRecord {
    /// Deserialize from the JSON payload a places lookup produces.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn has_name(&self) -> bool {
        non_empty(&self.name)
    }

    pub fn has_address(&self) -> bool {
        non_empty(&self.formatted_address)
    }

    pub fn has_phone(&self) -> bool {
        non_empty(&self.formatted_phone_number)
    }

    pub fn has_website(&self) -> bool {
        non_empty(&self.website)
    }

    /// A website only counts as usable when it carries an http(s) scheme.
    pub fn has_valid_website(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|w| w.starts_with("http"))
    }

    pub fn has_hours(&self) -> bool {
        self.current_opening_hours
            .as_ref()
            .is_some_and(|h| !h.is_empty())
    }

    pub fn has_rating(&self) -> bool {
        self.rating.is_some_and(|r| r != 0.0)
    }

    pub fn has_reviews(&self) -> bool {
        self.user_ratings_total.is_some_and(|n| n > 0)
    }

    pub fn has_coordinates(&self) -> bool {
        self.geometry.as_ref().is_some_and(|g| g.location.is_some())
    }

    pub fn is_operational(&self) -> bool {
        self.business_status.as_deref() == Some("OPERATIONAL")
    }
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// The caller's side of an evaluation: which company was searched for, and
/// optionally which region the record is expected to sit in. The region is
/// consumed by the external region validator, not by the core; it is
/// carried so hosts can echo it alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyQuery {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CompanyQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}
