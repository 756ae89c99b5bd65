use std::cmp::Ordering;
use std::fmt;

use crate::foundation::error::{PanoError, PanoResult};

/// Compass angle in degrees at which a directional image was captured.
///
/// Always finite and inside `[0, 360)`. Ordering is total, so headings can be used directly as
/// sort keys.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Heading(f64);

impl Heading {
    /// Create a validated heading.
    pub fn new(degrees: f64) -> PanoResult<Self> {
        if !degrees.is_finite() {
            return Err(PanoError::validation("heading must be finite"));
        }
        if !(0.0..360.0).contains(&degrees) {
            return Err(PanoError::validation(format!(
                "heading {degrees} is outside [0, 360)"
            )));
        }
        // -0.0 would otherwise sort apart from 0.0.
        Ok(Self(degrees + 0.0))
    }

    /// Heading in degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Heading {
    type Error = PanoError;

    fn try_from(value: f64) -> PanoResult<Self> {
        Self::new(value)
    }
}

impl From<Heading> for f64 {
    fn from(value: Heading) -> Self {
        value.0
    }
}

impl PartialEq for Heading {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Heading {}

impl PartialOrd for Heading {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Heading {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// `n` headings evenly spaced around the full circle, starting at 0°.
///
/// `standard_headings(8)` is the usual `0, 45, ..., 315` capture table.
pub fn standard_headings(n: u32) -> PanoResult<Vec<Heading>> {
    if n == 0 {
        return Err(PanoError::validation("sample count must be > 0"));
    }
    let step = 360.0 / f64::from(n);
    (0..n).map(|i| Heading::new(f64::from(i) * step)).collect()
}

/// Geographic point a panorama was captured at.
///
/// The decimal text the caller supplied is kept verbatim so artifact names reproduce it exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
    lat_text: String,
    lng_text: String,
}

impl Coordinates {
    /// Build coordinates from numeric values; names use their shortest decimal form.
    pub fn new(lat: f64, lng: f64) -> PanoResult<Self> {
        validate_lat_lng(lat, lng)?;
        Ok(Self {
            lat,
            lng,
            lat_text: lat.to_string(),
            lng_text: lng.to_string(),
        })
    }

    /// Parse decimal text, keeping the original spelling for naming.
    pub fn parse(lat: &str, lng: &str) -> PanoResult<Self> {
        let lat_text = lat.trim();
        let lng_text = lng.trim();
        let lat_val: f64 = lat_text
            .parse()
            .map_err(|_| PanoError::validation(format!("latitude '{lat_text}' is not a number")))?;
        let lng_val: f64 = lng_text.parse().map_err(|_| {
            PanoError::validation(format!("longitude '{lng_text}' is not a number"))
        })?;
        validate_lat_lng(lat_val, lng_val)?;
        Ok(Self {
            lat: lat_val,
            lng: lng_val,
            lat_text: lat_text.to_string(),
            lng_text: lng_text.to_string(),
        })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude exactly as supplied.
    pub fn lat_text(&self) -> &str {
        &self.lat_text
    }

    /// Longitude exactly as supplied.
    pub fn lng_text(&self) -> &str {
        &self.lng_text
    }
}

fn validate_lat_lng(lat: f64, lng: f64) -> PanoResult<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(PanoError::validation(format!(
            "latitude {lat} is outside [-90, 90]"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(PanoError::validation(format!(
            "longitude {lng} is outside [-180, 180]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
