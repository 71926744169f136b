//! Supported games and request selectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Number of main numbers drawn in every supported game.
pub const MAIN_NUMBER_COUNT: usize = 5;

/// A supported lottery game.
///
/// The game drives both request construction (its endpoint slug) and
/// presentation (number ranges, special ball naming). It is never inferred
/// from response payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    /// Mega Millions: 5 of 1..=70 plus a Mega Ball from 1..=25
    MegaMillions,
    /// Powerball: 5 of 1..=69 plus a Powerball from 1..=26
    Powerball,
}

impl Game {
    /// Every supported game, in display order.
    pub const ALL: [Game; 2] = [Game::MegaMillions, Game::Powerball];

    /// Number of main numbers in a combination.
    pub fn main_number_count(self) -> usize {
        MAIN_NUMBER_COUNT
    }

    /// Valid main numbers.
    pub fn main_number_range(self) -> RangeInclusive<u8> {
        match self {
            Game::MegaMillions => 1..=70,
            Game::Powerball => 1..=69,
        }
    }

    /// Valid special ball numbers.
    pub fn special_ball_range(self) -> RangeInclusive<u8> {
        match self {
            Game::MegaMillions => 1..=25,
            Game::Powerball => 1..=26,
        }
    }

    /// Human-readable special ball name.
    pub fn special_ball_name(self) -> &'static str {
        match self {
            Game::MegaMillions => "Mega Ball",
            Game::Powerball => "Powerball",
        }
    }

    /// Field name this game's payloads use for the special ball.
    pub fn special_ball_field(self) -> &'static str {
        match self {
            Game::MegaMillions => "mega_ball",
            Game::Powerball => "powerball",
        }
    }

    /// Path segment under the service base URL.
    pub fn endpoint_slug(self) -> &'static str {
        match self {
            Game::MegaMillions => "mega-millions",
            Game::Powerball => "powerball",
        }
    }

    /// Display name of the game.
    pub fn display_name(self) -> &'static str {
        match self {
            Game::MegaMillions => "Mega Millions",
            Game::Powerball => "Powerball",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which number pool a frequency table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum FrequencyCategory {
    Main,
    Special,
}

impl FrequencyCategory {
    /// Value of the `category` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            FrequencyCategory::Main => "main",
            FrequencyCategory::Special => "special",
        }
    }
}

/// How the service should generate a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Weighted by historical position frequencies
    Optimized,
    /// Uniformly random
    Random,
}

impl GenerationMode {
    /// Endpoint name for this mode.
    pub fn endpoint(self) -> &'static str {
        match self {
            GenerationMode::Optimized => "generate-optimized",
            GenerationMode::Random => "generate-random",
        }
    }
}
