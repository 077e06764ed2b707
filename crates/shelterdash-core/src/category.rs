//! Rescue categories and their fixed filter presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Inclusive age range in weeks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub lo: f64,
    pub hi: f64,
}

impl AgeRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, weeks: f64) -> bool {
        weeks >= self.lo && weeks <= self.hi
    }
}

/// Static constraints owned by a non-reset category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryPreset {
    pub breeds: &'static [&'static str],
    pub sex: &'static str,
    pub age_weeks: AgeRange,
}

const WATER: CategoryPreset = CategoryPreset {
    breeds: &[
        "Labrador Retriever Mix",
        "Chesapeake Bay Retriever",
        "Newfoundland",
    ],
    sex: "Intact Female",
    age_weeks: AgeRange::new(26.0, 156.0),
};

const MOUNTAIN: CategoryPreset = CategoryPreset {
    breeds: &[
        "German Shepherd",
        "Alaskan Malamute",
        "Old English Sheepdog",
        "Siberian Husky",
        "Rottweiler",
    ],
    sex: "Intact Male",
    age_weeks: AgeRange::new(26.0, 156.0),
};

const DISASTER: CategoryPreset = CategoryPreset {
    breeds: &[
        "Doberman Pinscher",
        "German Shepherd",
        "Golden Retriever",
        "Bloodhound",
        "Rottweiler",
    ],
    sex: "Intact Male",
    age_weeks: AgeRange::new(20.0, 300.0),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescueCategory {
    Water,
    Mountain,
    Disaster,
    /// No category constraint.
    #[default]
    Reset,
}

impl RescueCategory {
    pub const ALL: [RescueCategory; 4] = [
        RescueCategory::Water,
        RescueCategory::Mountain,
        RescueCategory::Disaster,
        RescueCategory::Reset,
    ];

    /// The fixed preset, or `None` for `Reset`.
    pub fn preset(self) -> Option<&'static CategoryPreset> {
        match self {
            RescueCategory::Water => Some(&WATER),
            RescueCategory::Mountain => Some(&MOUNTAIN),
            RescueCategory::Disaster => Some(&DISASTER),
            RescueCategory::Reset => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RescueCategory::Water => "water",
            RescueCategory::Mountain => "mountain",
            RescueCategory::Disaster => "disaster",
            RescueCategory::Reset => "reset",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RescueCategory::Water => "Water Rescue",
            RescueCategory::Mountain => "Mountain or Wilderness Rescue",
            RescueCategory::Disaster => "Disaster or Individual Tracking",
            RescueCategory::Reset => "Reset",
        }
    }
}

impl fmt::Display for RescueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RescueCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RescueCategory::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("unknown rescue category '{s}'")))
    }
}
