use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::NeoError;

/// One close approach of an object to a body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseApproach {
    /// Time of closest approach
    pub approach_timestamp: NaiveDateTime,
    pub relative_velocity_km_per_sec: f64,
    pub miss_distance_km: f64,
    /// e.g. "Earth"
    pub orbiting_body: String,
}

/// A near-Earth object with at least one close approach.
///
/// Built only through [`NearEarthObject::new`], which rejects records without
/// approaches, so [`NearEarthObject::representative_approach`] never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearEarthObject {
    pub id: String,
    pub name: String,
    pub estimated_diameter_min_km: f64,
    pub estimated_diameter_max_km: f64,
    pub is_hazardous: bool,
    close_approaches: Vec<CloseApproach>,
}

impl NearEarthObject {
    pub fn new(
        id: String,
        name: String,
        estimated_diameter_min_km: f64,
        estimated_diameter_max_km: f64,
        is_hazardous: bool,
        close_approaches: Vec<CloseApproach>,
    ) -> Result<Self, NeoError> {
        if close_approaches.is_empty() {
            return Err(NeoError::malformed(format!(
                "object {} has no close approach data",
                id
            )));
        }
        if estimated_diameter_min_km > estimated_diameter_max_km {
            return Err(NeoError::malformed(format!(
                "object {} has min diameter {} above max diameter {}",
                id, estimated_diameter_min_km, estimated_diameter_max_km
            )));
        }

        Ok(Self {
            id,
            name,
            estimated_diameter_min_km,
            estimated_diameter_max_km,
            is_hazardous,
            close_approaches,
        })
    }

    pub fn close_approaches(&self) -> &[CloseApproach] {
        &self.close_approaches
    }

    /// First close approach, used whenever a single approach's metrics are needed
    pub fn representative_approach(&self) -> &CloseApproach {
        &self.close_approaches[0]
    }

    pub fn miss_distance_km(&self) -> f64 {
        self.representative_approach().miss_distance_km
    }
}

/// Objects approaching on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    /// Date key as sent by the feed, e.g. "2024-01-15"
    pub date: String,
    pub objects: Vec<NearEarthObject>,
}

/// Date-keyed feed response, groups kept in the order the feed returned them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedResult {
    pub groups: Vec<DateGroup>,
}

impl FeedResult {
    pub fn new(groups: Vec<DateGroup>) -> Self {
        Self { groups }
    }

    pub fn object_count(&self) -> usize {
        self.groups.iter().map(|g| g.objects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Summary metrics over a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NeoStats {
    pub total: usize,
    pub hazardous_count: usize,
    pub safe_count: usize,
    /// Smallest miss distance in thousands of km, rounded to the nearest integer
    pub closest_distance_thousand_km: u64,
}

#[cfg(test)]
pub(crate) fn sample_neo(
    id: &str,
    is_hazardous: bool,
    miss_distance_km: f64,
    velocity_km_s: f64,
    diameter_max_km: f64,
    timestamp: &str,
) -> NearEarthObject {
    let approach = CloseApproach {
        approach_timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M").unwrap(),
        relative_velocity_km_per_sec: velocity_km_s,
        miss_distance_km,
        orbiting_body: "Earth".to_string(),
    };
    NearEarthObject::new(
        id.to_string(),
        format!("({})", id),
        diameter_max_km / 2.0,
        diameter_max_km,
        is_hazardous,
        vec![approach],
    )
    .unwrap()
}
