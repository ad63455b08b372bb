use serde::{Deserialize, Serialize};

use crate::{
    error::DiceError,
    randomness::Roller,
    rules::dice_set::{DiceOptions, DiceSet, KeepMode, Totaled, total_dice},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Produce the [`DiceSet`] itself.
    Roll,
    /// Produce only the total.
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keep {
    pub mode: KeepMode,
    pub count: u32,
}

/// A fully defaulted roll request, as read from an identifier such as
/// `roll_3d20_highest2_plus6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollSpec {
    pub action: Action,
    pub sides: u32,
    pub count: u32,
    pub keep: Option<Keep>,
    pub modifier: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollOutcome {
    Dice(DiceSet),
    Total(i32),
}

impl RollOutcome {
    pub fn total(&self) -> i32 {
        match self {
            RollOutcome::Dice(dice) => dice.total(),
            RollOutcome::Total(total) => *total,
        }
    }

    pub fn into_dice(self) -> Option<DiceSet> {
        match self {
            RollOutcome::Dice(dice) => Some(dice),
            RollOutcome::Total(_) => None,
        }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        match self {
            RollOutcome::Dice(dice) => dice.pretty_print(f),
            RollOutcome::Total(total) => write!(f, "{total}"),
        }
    }
}

impl Totaled for RollOutcome {
    fn total(&self) -> i32 {
        RollOutcome::total(self)
    }
}

impl RollSpec {
    /// The bonus to roll with, given the one supplied at call time.
    ///
    /// When both are present they have to agree.
    pub fn merged_bonus(&self, explicit: Option<i32>) -> Result<Option<i32>, DiceError> {
        match (explicit, self.modifier) {
            (Some(explicit), Some(encoded)) if explicit != encoded => {
                Err(DiceError::BonusMismatch { explicit, encoded })
            }
            (explicit, encoded) => Ok(encoded.or(explicit)),
        }
    }

    fn options_with_bonus(&self, options: &DiceOptions) -> Result<DiceOptions, DiceError> {
        Ok(DiceOptions {
            bonus: self.merged_bonus(options.bonus)?,
            ..options.clone()
        })
    }

    /// Rolls the dice and applies the keep clause, if any.
    pub fn roll(&self, options: &DiceOptions, roller: &mut Roller) -> Result<DiceSet, DiceError> {
        let options = self.options_with_bonus(options)?;
        let mut dice = DiceSet::new(self.sides, self.count, &options, roller)?;
        if let Some(keep) = self.keep {
            dice.keep(keep.mode, Some(keep.count))?;
        }
        Ok(dice)
    }

    /// Rolls and totals. Without a keep clause no dice are kept around.
    pub fn total(&self, options: &DiceOptions, roller: &mut Roller) -> Result<i32, DiceError> {
        if self.keep.is_some() {
            return Ok(self.roll(options, roller)?.total());
        }
        let options = self.options_with_bonus(options)?;
        total_dice(self.sides, self.count, &options, roller)
    }

    pub fn invoke(
        &self,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<RollOutcome, DiceError> {
        match self.action {
            Action::Roll => self.roll(options, roller).map(RollOutcome::Dice),
            Action::Total => self.total(options, roller).map(RollOutcome::Total),
        }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if let Some(keep) = self.keep {
            match keep.mode {
                KeepMode::Highest => write!(f, " keep highest {}", keep.count)?,
                KeepMode::Lowest => write!(f, " keep lowest {}", keep.count)?,
            }
        }
        match self.modifier {
            Some(modifier) if modifier >= 0 => write!(f, " +{modifier}")?,
            Some(modifier) => write!(f, " {modifier}")?,
            None => {}
        }
        if self.action == Action::Total {
            write!(f, " (total)")?;
        }
        Ok(())
    }
}
