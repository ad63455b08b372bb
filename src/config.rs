use std::{num::NonZeroU32, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::DiceError,
    randomness::Technique,
    rules::die::{DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR, DieMetadata},
    utils::{IntegerLike, parse_positive},
};

/// Validated settings shared by rollers and the ability score generator.
///
/// Every setter validates its input, so a `Config` obtained through
/// [`Config::default`], the setters, or [`Config::load`] always satisfies
/// "dice kept ≤ dice rolled" and has positive ability score fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    technique: Technique,
    reseed_interval: Option<NonZeroU32>,
    ability_score_array_size: u32,
    ability_score_sides: u32,
    ability_score_dice_rolled: u32,
    ability_score_dice_kept: u32,
    die_foreground_color: String,
    die_background_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            technique: Technique::default(),
            reseed_interval: None,
            ability_score_array_size: 6,
            ability_score_sides: 6,
            ability_score_dice_rolled: 4,
            ability_score_dice_kept: 3,
            die_foreground_color: DEFAULT_FOREGROUND_COLOR.to_string(),
            die_background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self)?;
        Ok(())
    }

    /// Checks the invariants that deserialization cannot enforce on its own.
    pub fn validate(&self) -> Result<(), DiceError> {
        for (what, value) in [
            ("ability_score_array_size", self.ability_score_array_size),
            ("ability_score_sides", self.ability_score_sides),
            ("ability_score_dice_rolled", self.ability_score_dice_rolled),
            ("ability_score_dice_kept", self.ability_score_dice_kept),
        ] {
            parse_positive(what, &value)?;
        }
        if self.ability_score_dice_kept > self.ability_score_dice_rolled {
            return Err(DiceError::KeptExceedsRolled {
                kept: self.ability_score_dice_kept,
                rolled: self.ability_score_dice_rolled,
            });
        }
        Ok(())
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn set_technique(&mut self, technique: Technique) {
        self.technique = technique;
    }

    pub fn set_technique_name(&mut self, name: &str) -> Result<(), DiceError> {
        self.technique = name.parse()?;
        Ok(())
    }

    pub fn reseed_interval(&self) -> Option<NonZeroU32> {
        self.reseed_interval
    }

    pub fn set_reseed_interval<T: IntegerLike + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), DiceError> {
        self.reseed_interval = NonZeroU32::new(parse_positive("reseed_interval", value)?);
        Ok(())
    }

    /// Never reseed automatically.
    pub fn clear_reseed_interval(&mut self) {
        self.reseed_interval = None;
    }

    pub fn ability_score_array_size(&self) -> u32 {
        self.ability_score_array_size
    }

    pub fn set_ability_score_array_size<T: IntegerLike + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), DiceError> {
        self.ability_score_array_size = parse_positive("ability_score_array_size", value)?;
        Ok(())
    }

    pub fn ability_score_sides(&self) -> u32 {
        self.ability_score_sides
    }

    pub fn set_ability_score_sides<T: IntegerLike + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), DiceError> {
        self.ability_score_sides = parse_positive("ability_score_sides", value)?;
        Ok(())
    }

    pub fn ability_score_dice_rolled(&self) -> u32 {
        self.ability_score_dice_rolled
    }

    pub fn set_ability_score_dice_rolled<T: IntegerLike + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), DiceError> {
        let rolled = parse_positive("ability_score_dice_rolled", value)?;
        if rolled < self.ability_score_dice_kept {
            return Err(DiceError::KeptExceedsRolled {
                kept: self.ability_score_dice_kept,
                rolled,
            });
        }
        self.ability_score_dice_rolled = rolled;
        Ok(())
    }

    pub fn ability_score_dice_kept(&self) -> u32 {
        self.ability_score_dice_kept
    }

    pub fn set_ability_score_dice_kept<T: IntegerLike + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), DiceError> {
        let kept = parse_positive("ability_score_dice_kept", value)?;
        if kept > self.ability_score_dice_rolled {
            return Err(DiceError::KeptExceedsRolled {
                kept,
                rolled: self.ability_score_dice_rolled,
            });
        }
        self.ability_score_dice_kept = kept;
        Ok(())
    }

    pub fn die_foreground_color(&self) -> &str {
        &self.die_foreground_color
    }

    pub fn set_die_foreground_color(&mut self, color: impl Into<String>) {
        self.die_foreground_color = color.into();
    }

    pub fn die_background_color(&self) -> &str {
        &self.die_background_color
    }

    pub fn set_die_background_color(&mut self, color: impl Into<String>) {
        self.die_background_color = color.into();
    }

    /// Display metadata new dice start with.
    pub fn die_metadata(&self) -> DieMetadata {
        DieMetadata {
            foreground_color: self.die_foreground_color.clone(),
            background_color: self.die_background_color.clone(),
            damage_type: None,
        }
    }
}
