//! Decoding helpers for the service's inconsistent JSON
//!
//! The two games share one schema but name the special ball differently
//! (`mega_ball` vs `powerball`), and multipliers may arrive as floats.
//! Records decode through a raw shape first and are then validated.

use serde::{Deserialize, Deserializer, de};
use std::collections::BTreeSet;

use super::game::{Game, MAIN_NUMBER_COUNT};

const INTEGRAL_EPSILON: f64 = 1e-9;

/// Every special-ball spelling a record may carry, tried in field order.
///
/// `special_ball` is the canonical name this crate encodes with, so encoded
/// records decode again.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpecialBallFields {
    #[serde(default)]
    mega_ball: Option<u8>,
    #[serde(default)]
    powerball: Option<u8>,
    #[serde(default)]
    special_ball: Option<u8>,
}

impl SpecialBallFields {
    /// First present field wins; the field itself is the discriminator.
    pub(crate) fn resolve(&self, record: &str) -> Result<u8, String> {
        self.mega_ball.or(self.powerball).or(self.special_ball).ok_or_else(|| {
            let expected: Vec<String> =
                Game::ALL.iter().map(|game| format!("`{}`", game.special_ball_field())).collect();
            format!("{}: missing special ball field (expected {})", record, expected.join(" or "))
        })
    }
}

/// Coerce a JSON number into an integer, rejecting fractional values.
pub(crate) fn integral_u32(field: &str, value: f64) -> Result<u32, String> {
    let rounded = value.round();
    if !value.is_finite() || (value - rounded).abs() > INTEGRAL_EPSILON {
        return Err(format!("{}: expected a whole number, found {}", field, value));
    }
    if rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return Err(format!("{}: value {} out of range", field, value));
    }
    Ok(rounded as u32)
}

/// `deserialize_with` target for optional multipliers (`2`, `2.0`, `null`).
pub(crate) fn optional_multiplier<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(|value| integral_u32("multiplier", value).map_err(de::Error::custom))
        .transpose()
}

/// Main numbers must be exactly five distinct values.
pub(crate) fn validate_main_numbers(record: &str, numbers: &[u8]) -> Result<(), String> {
    if numbers.len() != MAIN_NUMBER_COUNT {
        return Err(format!(
            "{}.main_numbers: expected {} numbers, found {}",
            record,
            MAIN_NUMBER_COUNT,
            numbers.len()
        ));
    }
    let distinct: BTreeSet<u8> = numbers.iter().copied().collect();
    if distinct.len() != numbers.len() {
        return Err(format!("{}.main_numbers: duplicate numbers in {:?}", record, numbers));
    }
    Ok(())
}
