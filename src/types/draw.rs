//! Historical draw results

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::wire::{SpecialBallFields, optional_multiplier, validate_main_numbers};

/// One historical draw.
///
/// Identity is the draw date, which is unique per game. Values are only
/// produced by decoding service responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DrawResult {
    pub draw_date: NaiveDate,
    /// Five distinct numbers in the order the service reported them
    pub main_numbers: Vec<u8>,
    pub special_ball: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
}

#[derive(Deserialize)]
struct RawDrawResult {
    draw_date: NaiveDate,
    main_numbers: Vec<u8>,
    #[serde(flatten)]
    special_ball: SpecialBallFields,
    #[serde(default, deserialize_with = "optional_multiplier")]
    multiplier: Option<u32>,
    #[serde(default)]
    prize: Option<String>,
}

impl TryFrom<RawDrawResult> for DrawResult {
    type Error = String;

    fn try_from(raw: RawDrawResult) -> Result<Self, Self::Error> {
        let record = format!("draw {}", raw.draw_date);
        validate_main_numbers(&record, &raw.main_numbers)?;
        let special_ball = raw.special_ball.resolve(&record)?;

        Ok(DrawResult {
            draw_date: raw.draw_date,
            main_numbers: raw.main_numbers,
            special_ball,
            multiplier: raw.multiplier,
            prize: raw.prize,
        })
    }
}

impl<'de> Deserialize<'de> for DrawResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDrawResult::deserialize(deserializer)?;
        DrawResult::try_from(raw).map_err(de::Error::custom)
    }
}

/// One page of the latest draws, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestResultsPage {
    #[serde(rename = "latest_numbers")]
    pub results: Vec<DrawResult>,
    #[serde(default)]
    pub has_more: bool,
}
