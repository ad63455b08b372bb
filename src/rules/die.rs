use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    error::DiceError,
    randomness::{Roller, Technique},
};

pub const DEFAULT_FOREGROUND_COLOR: &str = "#DDDDDD";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#0000DD";

/// Presentation data carried by a die. Never interpreted by the roller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieMetadata {
    pub foreground_color: String,
    pub background_color: String,
    pub damage_type: Option<String>,
}

impl Default for DieMetadata {
    fn default() -> Self {
        DieMetadata {
            foreground_color: DEFAULT_FOREGROUND_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            damage_type: None,
        }
    }
}

/// A single rolled die.
///
/// A die is rolled as part of construction, so it always holds a value in
/// `1..=sides`. Whether it counts towards a total is decided by the
/// [`DiceSet`](super::dice_set::DiceSet) that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    sides: u32,
    value: u32,
    included: bool,
    technique: Option<Technique>,
    metadata: DieMetadata,
}

impl Die {
    pub fn new(
        sides: u32,
        technique: Option<Technique>,
        metadata: DieMetadata,
        roller: &mut Roller,
    ) -> Result<Self, DiceError> {
        let value = roller.roll(sides, technique)?;
        Ok(Die {
            sides,
            value,
            included: true,
            technique,
            metadata,
        })
    }

    /// Rolls again, replacing and returning the value.
    pub fn roll(&mut self, roller: &mut Roller) -> Result<u32, DiceError> {
        self.value = roller.roll(self.sides, self.technique)?;
        Ok(self.value)
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_included(&self) -> bool {
        self.included
    }

    pub(crate) fn set_included(&mut self, included: bool) {
        self.included = included;
    }

    pub fn technique(&self) -> Option<Technique> {
        self.technique
    }

    pub fn set_technique(&mut self, technique: Option<Technique>) {
        self.technique = technique;
    }

    pub fn metadata(&self) -> &DieMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DieMetadata {
        &mut self.metadata
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        if self.included {
            write!(f, "{}", self.value)
        } else {
            write!(f, "({})", self.value)
        }
    }
}

/// Orders dice by face value alone.
pub fn compare_by_value(a: &Die, b: &Die) -> Ordering {
    a.value.cmp(&b.value)
}
