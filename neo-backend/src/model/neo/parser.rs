///! NeoWs JSON schema and conversion into validated domain types
///!
///! Feed and lookup responses share the same object record shape. Numeric
///! approach fields arrive as decimal strings; plain JSON numbers are accepted too.

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use super::error::NeoError;
use super::types::{CloseApproach, DateGroup, FeedResult, NearEarthObject};

/// Layout of `close_approach_date_full`, e.g. "2024-Jan-15 12:34"
const APPROACH_TIMESTAMP_FORMAT: &str = "%Y-%b-%d %H:%M";

#[derive(Debug, Deserialize)]
struct RawFeed {
    near_earth_objects: DateBuckets,
}

/// Date buckets in document order
#[derive(Debug)]
struct DateBuckets(Vec<(String, Vec<RawNeo>)>);

impl<'de> Deserialize<'de> for DateBuckets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BucketVisitor;

        impl<'de> Visitor<'de> for BucketVisitor {
            type Value = DateBuckets;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from date to a list of objects")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut buckets = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((date, objects)) = map.next_entry::<String, Vec<RawNeo>>()? {
                    buckets.push((date, objects));
                }
                Ok(DateBuckets(buckets))
            }
        }

        deserializer.deserialize_map(BucketVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct RawNeo {
    id: String,
    name: String,
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: RawEstimatedDiameter,
    close_approach_data: Vec<RawCloseApproach>,
}

#[derive(Debug, Deserialize)]
struct RawEstimatedDiameter {
    kilometers: RawDiameterRange,
}

#[derive(Debug, Deserialize)]
struct RawDiameterRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawCloseApproach {
    close_approach_date_full: String,
    relative_velocity: RawVelocity,
    miss_distance: RawMissDistance,
    orbiting_body: String,
}

#[derive(Debug, Deserialize)]
struct RawVelocity {
    kilometers_per_second: RawNumber,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: RawNumber,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Parse into a finite, non-negative value
    fn to_non_negative(&self, field: &str, id: &str) -> Result<f64, NeoError> {
        let value = match self {
            RawNumber::Number(n) => *n,
            RawNumber::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                NeoError::malformed(format!("object {}: {} is not a number: {:?}", id, field, s))
            })?,
        };

        if !value.is_finite() || value < 0.0 {
            return Err(NeoError::malformed(format!(
                "object {}: {} must be a non-negative number, got {}",
                id, field, value
            )));
        }
        Ok(value)
    }
}

fn parse_approach(raw: RawCloseApproach, id: &str) -> Result<CloseApproach, NeoError> {
    let approach_timestamp =
        NaiveDateTime::parse_from_str(raw.close_approach_date_full.trim(), APPROACH_TIMESTAMP_FORMAT)
            .map_err(|e| {
                NeoError::malformed(format!(
                    "object {}: invalid close_approach_date_full {:?}: {}",
                    id, raw.close_approach_date_full, e
                ))
            })?;

    Ok(CloseApproach {
        approach_timestamp,
        relative_velocity_km_per_sec: raw
            .relative_velocity
            .kilometers_per_second
            .to_non_negative("relative_velocity.kilometers_per_second", id)?,
        miss_distance_km: raw
            .miss_distance
            .kilometers
            .to_non_negative("miss_distance.kilometers", id)?,
        orbiting_body: raw.orbiting_body,
    })
}

fn into_neo(raw: RawNeo) -> Result<NearEarthObject, NeoError> {
    let diameter = raw.estimated_diameter.kilometers;
    for (field, value) in [
        ("estimated_diameter_min", diameter.estimated_diameter_min),
        ("estimated_diameter_max", diameter.estimated_diameter_max),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(NeoError::malformed(format!(
                "object {}: {} must be a non-negative number, got {}",
                raw.id, field, value
            )));
        }
    }

    let approaches = raw
        .close_approach_data
        .into_iter()
        .map(|a| parse_approach(a, &raw.id))
        .collect::<Result<Vec<_>, _>>()?;

    NearEarthObject::new(
        raw.id,
        raw.name,
        diameter.estimated_diameter_min,
        diameter.estimated_diameter_max,
        raw.is_potentially_hazardous_asteroid,
        approaches,
    )
}

/// Parse a feed response body into a [`FeedResult`].
pub fn parse_feed_json(json: &str) -> Result<FeedResult, NeoError> {
    let raw: RawFeed = serde_json::from_str(json)
        .map_err(|e| NeoError::malformed(format!("invalid feed response: {}", e)))?;

    let groups = raw
        .near_earth_objects
        .0
        .into_iter()
        .map(|(date, objects)| {
            let objects = objects
                .into_iter()
                .map(into_neo)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DateGroup { date, objects })
        })
        .collect::<Result<Vec<_>, NeoError>>()?;

    Ok(FeedResult::new(groups))
}

/// Parse a single-object lookup response body.
pub fn parse_neo_json(json: &str) -> Result<NearEarthObject, NeoError> {
    let raw: RawNeo = serde_json::from_str(json)
        .map_err(|e| NeoError::malformed(format!("invalid object response: {}", e)))?;
    into_neo(raw)
}
