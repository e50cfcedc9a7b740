use crate::error::{PwqError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Meteorological season of a month.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// {12,1,2} Winter, {3,4,5} Spring, {6,7,8} Summer, {9,10,11} Autumn.
    pub fn from_month(month: u32) -> Result<Season> {
        match month {
            12 | 1 | 2 => Ok(Season::Winter),
            3..=5 => Ok(Season::Spring),
            6..=8 => Ok(Season::Summer),
            9..=11 => Ok(Season::Autumn),
            m => Err(PwqError::InvalidMonth(m)),
        }
    }
}

/// Label encodings for the categorical model features, as exported with
/// the coefficient table.
///
/// Unknown river and station names encode to 0, the first class. A misspelled
/// or newly added station still gets a (less accurate) prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEncoder {
    rivers: HashMap<String, usize>,
    locations: HashMap<String, usize>,
    seasons: HashMap<Season, usize>,
}

impl FeatureEncoder {
    pub fn new(
        rivers: HashMap<String, usize>,
        locations: HashMap<String, usize>,
        seasons: HashMap<Season, usize>,
    ) -> Self {
        FeatureEncoder {
            rivers,
            locations,
            seasons,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for season in Season::ALL {
            if !self.seasons.contains_key(&season) {
                return Err(PwqError::Configuration(format!(
                    "season encoder has no code for {:?}",
                    season
                )));
            }
        }
        Ok(())
    }

    pub fn encode_river(&self, name: &str) -> usize {
        match self.rivers.get(name) {
            Some(code) => *code,
            None => {
                debug!("Unknown river '{}', using code 0", name);
                0
            }
        }
    }

    pub fn encode_station(&self, name: &str) -> usize {
        match self.locations.get(name) {
            Some(code) => *code,
            None => {
                debug!("Unknown station '{}', using code 0", name);
                0
            }
        }
    }

    pub fn encode_season(&self, month: u32) -> Result<usize> {
        let season = Season::from_month(month)?;
        Ok(self.seasons.get(&season).copied().unwrap_or(0))
    }

    /// River names ordered by code.
    pub fn rivers(&self) -> Vec<&str> {
        sorted_by_code(&self.rivers)
    }

    /// Station names ordered by code.
    pub fn locations(&self) -> Vec<&str> {
        sorted_by_code(&self.locations)
    }

    /// Seasons ordered by code.
    pub fn seasons(&self) -> Vec<Season> {
        let mut seasons: Vec<(Season, usize)> =
            self.seasons.iter().map(|(s, c)| (*s, *c)).collect();
        seasons.sort_by_key(|(_, c)| *c);
        seasons.into_iter().map(|(s, _)| s).collect()
    }
}

fn sorted_by_code(map: &HashMap<String, usize>) -> Vec<&str> {
    let mut entries: Vec<(&str, usize)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
    entries.into_iter().map(|(k, _)| k).collect()
}
