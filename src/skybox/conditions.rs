//! Environment gating: world, biome, height and weather checks.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::Identifier;

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Weather kinds a skybox can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Rain,
    Snow,
    Thunder,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Self::Clear, Self::Rain, Self::Snow, Self::Thunder];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunder => "thunder",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.as_str() == text)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precipitation type of the biome the player stands in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precipitation {
    #[default]
    None,
    Rain,
    Snow,
}

// ---------------------------------------------------------------------------
// HeightRange
// ---------------------------------------------------------------------------

/// Open interval of player heights, `min < y < max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightRange {
    min: f32,
    max: f32,
}

impl HeightRange {
    /// Returns `None` when `min > max` or either bound is NaN.
    pub fn new(min: f32, max: f32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Exclusive on both ends.
    #[inline]
    pub fn contains(&self, height: f64) -> bool {
        f64::from(self.min) < height && f64::from(self.max) > height
    }
}

// ---------------------------------------------------------------------------
// EnvironmentSnapshot
// ---------------------------------------------------------------------------

/// Per-frame read of the game state used for gating and fading.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentSnapshot {
    pub world: Identifier,
    pub biome: Identifier,
    pub player_height: f64,
    pub raining: bool,
    pub thundering: bool,
    pub precipitation: Precipitation,
    /// Absolute world time in ticks; wrapped to the day cycle when used.
    pub time_of_day: i64,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Environment restrictions of a skybox. Empty sets mean "any".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conditions {
    pub worlds: BTreeSet<Identifier>,
    pub biomes: BTreeSet<Identifier>,
    pub heights: Vec<HeightRange>,
    pub weather: BTreeSet<Weather>,
}

impl Conditions {
    /// Whether the environment satisfies every restriction.
    pub fn matches(&self, env: &EnvironmentSnapshot) -> bool {
        self.check_world_and_biome(env) && self.check_height(env) && self.check_weather(env)
    }

    /// The biome list only applies inside an allowed world.
    pub fn check_world_and_biome(&self, env: &EnvironmentSnapshot) -> bool {
        if self.worlds.is_empty() || self.worlds.contains(&env.world) {
            return self.biomes.is_empty() || self.biomes.contains(&env.biome);
        }
        false
    }

    pub fn check_height(&self, env: &EnvironmentSnapshot) -> bool {
        self.heights.is_empty() || self.heights.iter().any(|r| r.contains(env.player_height))
    }

    /// Thunder implies rain, so a rain-only skybox stays hidden during storms.
    pub fn check_weather(&self, env: &EnvironmentSnapshot) -> bool {
        if self.weather.is_empty() {
            return true;
        }
        if self.weather.contains(&Weather::Thunder) && env.thundering {
            true
        } else if self.weather.contains(&Weather::Snow)
            && env.raining
            && env.precipitation == Precipitation::Snow
        {
            true
        } else if self.weather.contains(&Weather::Rain) && env.raining && !env.thundering {
            true
        } else {
            self.weather.contains(&Weather::Clear)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> Identifier {
        Identifier::parse(text).unwrap()
    }

    fn clear_overworld() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            world: id("overworld"),
            biome: id("plains"),
            player_height: 64.0,
            raining: false,
            thundering: false,
            precipitation: Precipitation::Rain,
            time_of_day: 6_000,
        }
    }

    fn weather(list: &[Weather]) -> Conditions {
        Conditions {
            weather: list.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_conditions_always_match() {
        assert!(Conditions::default().matches(&clear_overworld()));
    }

    #[test]
    fn test_wrong_world_ignores_biome() {
        let conditions = Conditions {
            worlds: [id("overworld")].into(),
            ..Default::default()
        };
        let mut env = clear_overworld();
        env.world = id("the_nether");
        assert!(!conditions.matches(&env));

        // Even a matching biome list cannot rescue the wrong world
        let conditions = Conditions {
            worlds: [id("overworld")].into(),
            biomes: [id("nether_wastes")].into(),
            ..Default::default()
        };
        env.biome = id("nether_wastes");
        assert!(!conditions.matches(&env));
    }

    #[test]
    fn test_biome_checked_inside_allowed_world() {
        let conditions = Conditions {
            worlds: [id("overworld")].into(),
            biomes: [id("desert")].into(),
            ..Default::default()
        };
        let mut env = clear_overworld();
        assert!(!conditions.matches(&env));
        env.biome = id("desert");
        assert!(conditions.matches(&env));
    }

    #[test]
    fn test_height_bounds_are_exclusive() {
        let conditions = Conditions {
            heights: vec![HeightRange::new(60.0, 70.0).unwrap()],
            ..Default::default()
        };
        let mut env = clear_overworld();
        for (height, expected) in [(65.0, true), (60.0, false), (70.0, false), (59.0, false)] {
            env.player_height = height;
            assert_eq!(conditions.check_height(&env), expected, "height {height}");
        }
    }

    #[test]
    fn test_any_height_range_matches() {
        let conditions = Conditions {
            heights: vec![
                HeightRange::new(0.0, 10.0).unwrap(),
                HeightRange::new(100.0, 200.0).unwrap(),
            ],
            ..Default::default()
        };
        let mut env = clear_overworld();
        env.player_height = 150.0;
        assert!(conditions.matches(&env));
        env.player_height = 50.0;
        assert!(!conditions.matches(&env));
    }

    #[test]
    fn test_height_range_rejects_inverted() {
        assert!(HeightRange::new(70.0, 60.0).is_none());
        assert!(HeightRange::new(f32::NAN, 1.0).is_none());
        assert!(HeightRange::new(5.0, 5.0).is_some());
    }

    #[test]
    fn test_rain_only_hidden_during_thunder() {
        let mut env = clear_overworld();
        env.raining = true;
        env.thundering = true;
        assert!(!weather(&[Weather::Rain]).matches(&env));
        assert!(weather(&[Weather::Rain, Weather::Thunder]).matches(&env));
    }

    #[test]
    fn test_rain_matches_plain_rain() {
        let mut env = clear_overworld();
        env.raining = true;
        assert!(weather(&[Weather::Rain]).matches(&env));
        assert!(!weather(&[Weather::Thunder]).matches(&env));
    }

    #[test]
    fn test_snow_needs_snowy_biome() {
        let mut env = clear_overworld();
        env.raining = true;
        assert!(!weather(&[Weather::Snow]).matches(&env));
        env.precipitation = Precipitation::Snow;
        assert!(weather(&[Weather::Snow]).matches(&env));
    }

    #[test]
    fn test_clear_is_fallback() {
        let mut env = clear_overworld();
        assert!(weather(&[Weather::Clear]).matches(&env));
        assert!(!weather(&[Weather::Rain]).matches(&env));

        // "clear" also passes whenever no listed weather applies
        env.raining = true;
        env.thundering = true;
        assert!(weather(&[Weather::Rain, Weather::Clear]).matches(&env));
    }

    #[test]
    fn test_weather_parse() {
        assert_eq!(Weather::parse("thunder"), Some(Weather::Thunder));
        assert_eq!(Weather::parse("storm"), None);
        for w in Weather::ALL {
            assert_eq!(Weather::parse(w.as_str()), Some(w));
        }
    }
}
