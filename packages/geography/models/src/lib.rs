#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District reference and geo point types for map projections.
//!
//! Districts come from a static reference table and are never computed.
//! A [`GeoPoint`] joins one district with the crime total of the records
//! whose location names it.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// One row of the static district reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    /// District name as matched (case-insensitively) against `Location`.
    pub name: String,
    /// Latitude of the marker position.
    pub lat: f64,
    /// Longitude of the marker position.
    pub lng: f64,
    /// Administrative region the district rolls up into.
    pub region: String,
}

impl District {
    /// Marker position of this district.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Coarse bucket of a location's total count, used for marker emphasis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IntensityTier {
    /// Fewer than 20 incidents.
    VeryLow,
    /// 20 to 50 incidents.
    Low,
    /// 51 to 100 incidents.
    Medium,
    /// More than 100 incidents.
    High,
}

impl IntensityTier {
    /// Buckets a total count.
    #[must_use]
    pub fn for_total(total: f64) -> Self {
        if total > 100.0 {
            Self::High
        } else if total > 50.0 {
            Self::Medium
        } else if total >= 20.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Returns all variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::VeryLow, Self::Low, Self::Medium, Self::High]
    }
}

/// A district with data, ready to be placed on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// District name from the reference table.
    pub location_id: String,
    /// Marker position from the reference table.
    pub coordinates: Coordinates,
    /// Region of the district.
    pub region: String,
    /// Intensity bucket of `total_count`.
    pub intensity_tier: IntensityTier,
    /// Sum of every category value over the matching records.
    pub total_count: f64,
}
