//! Number frequency tables

use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::warn;

/// How often a number has been drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct NumberFrequency {
    pub number: u8,
    #[serde(rename = "count")]
    pub occurrence_count: u32,
    /// Share of draws containing the number, 0..=100
    pub percentage: f64,
}

impl NumberFrequency {
    /// Placeholder for a number the service omitted because it never occurred.
    pub fn zero(number: u8) -> Self {
        Self { number, occurrence_count: 0, percentage: 0.0 }
    }
}

fn validate_percentage(number: u8, percentage: f64) -> Result<f64, String> {
    if (0.0..=100.0).contains(&percentage) {
        Ok(percentage)
    } else {
        Err(format!("frequency of {}: percentage {} outside 0..=100", number, percentage))
    }
}

#[derive(Deserialize)]
struct RawNumberFrequency {
    number: u8,
    count: u32,
    percentage: f64,
}

impl<'de> Deserialize<'de> for NumberFrequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNumberFrequency::deserialize(deserializer)?;
        let percentage = validate_percentage(raw.number, raw.percentage).map_err(de::Error::custom)?;
        Ok(NumberFrequency { number: raw.number, occurrence_count: raw.count, percentage })
    }
}

/// A frequency record tagged with the draw slot it was counted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFrequency {
    /// 1-based slot within the sorted main numbers
    pub position: u8,
    pub number: u8,
    pub count: u32,
    pub percentage: f64,
}

impl PositionFrequency {
    fn into_number_frequency(self) -> NumberFrequency {
        NumberFrequency {
            number: self.number,
            occurrence_count: self.count,
            percentage: self.percentage,
        }
    }
}

/// All frequencies observed at one draw position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PositionFrequencyGroup {
    pub position: u8,
    pub entries: Vec<NumberFrequency>,
}

/// Group flat position-tagged records by position, ascending.
///
/// Entries keep the order the service returned them in.
pub fn group_by_position(records: Vec<PositionFrequency>) -> Vec<PositionFrequencyGroup> {
    let mut grouped: BTreeMap<u8, Vec<NumberFrequency>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.position).or_default().push(record.into_number_frequency());
    }

    grouped.into_iter().map(|(position, entries)| PositionFrequencyGroup { position, entries }).collect()
}

/// Cover every number in `range`, inserting zero records for omitted ones.
///
/// The result is sorted by number. Records outside `range` are kept rather
/// than dropped.
pub fn backfill_range(records: &[NumberFrequency], range: RangeInclusive<u8>) -> Vec<NumberFrequency> {
    let mut by_number: BTreeMap<u8, NumberFrequency> =
        range.clone().map(|number| (number, NumberFrequency::zero(number))).collect();

    for record in records {
        if !range.contains(&record.number) {
            warn!("Frequency record for {} outside range {:?}", record.number, range);
        }
        by_number.insert(record.number, record.clone());
    }

    by_number.into_values().collect()
}

/// Payload of the number-frequencies endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FrequencyPayload {
    pub frequencies: Vec<NumberFrequency>,
}

/// Payload of the position-frequencies endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PositionFrequencyPayload {
    pub position_frequencies: Vec<PositionFrequency>,
}
