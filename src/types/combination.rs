//! Combination checks and generated combinations

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;

use super::draw::DrawResult;
use super::game::GenerationMode;
use super::wire::{SpecialBallFields, validate_main_numbers};

/// A historical draw matching a checked combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CombinationMatch {
    pub date: NaiveDate,
    pub special_ball: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
}

#[derive(Deserialize)]
struct RawCombinationMatch {
    date: NaiveDate,
    #[serde(flatten)]
    special_ball: SpecialBallFields,
    #[serde(default)]
    prize: Option<String>,
}

impl<'de> Deserialize<'de> for CombinationMatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCombinationMatch::deserialize(deserializer)?;
        let special_ball =
            raw.special_ball.resolve(&format!("match {}", raw.date)).map_err(de::Error::custom)?;
        Ok(CombinationMatch { date: raw.date, special_ball, prize: raw.prize })
    }
}

/// Whether a combination has been drawn before, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CombinationQueryResult {
    #[serde(default)]
    pub exists: bool,
    #[serde(rename = "frequency", default, skip_serializing_if = "Option::is_none")]
    pub total_occurrences: Option<u32>,
    /// Main numbers as echoed back by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_numbers: Option<Vec<u8>>,
    #[serde(default)]
    pub matches: Vec<CombinationMatch>,
}

impl CombinationQueryResult {
    /// Present each match as a draw row.
    ///
    /// Main numbers come from the service's echo when present, else from
    /// `queried` sorted ascending. Matches carry no multiplier.
    pub fn into_draw_results(self, queried: &[u8]) -> Vec<DrawResult> {
        let main_numbers = self.main_numbers.unwrap_or_else(|| {
            let mut sorted = queried.to_vec();
            sorted.sort_unstable();
            sorted
        });

        self.matches
            .into_iter()
            .map(|m| DrawResult {
                draw_date: m.date,
                main_numbers: main_numbers.clone(),
                special_ball: m.special_ball,
                multiplier: None,
                prize: m.prize,
            })
            .collect()
    }
}

/// A combination produced by the service's generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct GeneratedCombination {
    pub main_numbers: Vec<u8>,
    pub special_ball: u8,
    /// Per-position percentages, only present for optimized generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_percentages: Option<BTreeMap<String, f64>>,
    /// Whether the combination has never been drawn
    pub is_unique: bool,
}

impl GeneratedCombination {
    /// Classify by the presence of position percentages.
    pub fn mode(&self) -> GenerationMode {
        if self.position_percentages.is_some() {
            GenerationMode::Optimized
        } else {
            GenerationMode::Random
        }
    }
}

#[derive(Deserialize)]
struct RawGeneratedCombination {
    main_numbers: Vec<u8>,
    special_ball: u8,
    #[serde(default)]
    position_percentages: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    is_unique: bool,
}

impl<'de> Deserialize<'de> for GeneratedCombination {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawGeneratedCombination::deserialize(deserializer)?;
        validate_main_numbers("generated combination", &raw.main_numbers).map_err(de::Error::custom)?;
        Ok(GeneratedCombination {
            main_numbers: raw.main_numbers,
            special_ball: raw.special_ball,
            position_percentages: raw.position_percentages,
            is_unique: raw.is_unique,
        })
    }
}

/// Body of a check-combination request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckCombinationRequest {
    pub numbers: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_ball: Option<u8>,
}

impl CheckCombinationRequest {
    /// Build a request with numbers sorted ascending.
    pub fn new(numbers: impl IntoIterator<Item = u8>, special_ball: Option<u8>) -> Self {
        let mut numbers: Vec<u8> = numbers.into_iter().collect();
        numbers.sort_unstable();
        Self { numbers, special_ball }
    }
}
