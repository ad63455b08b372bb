use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::DiceError,
    randomness::{Roller, Technique},
    rules::die::{Die, DieMetadata, compare_by_value},
    utils::{IntegerLike, parse_i32},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepMode {
    Highest,
    Lowest,
}

/// How many dice `highest`/`lowest` keep when no count is given:
/// all but one, or the only die of a single-die set.
pub fn default_keep_count(dice: u32) -> u32 {
    if dice == 1 { 1 } else { dice.saturating_sub(1) }
}

/// Anything that reduces to a single total.
pub trait Totaled {
    fn total(&self) -> i32;
}

/// Options applied to every die of a roll.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOptions {
    pub technique: Option<Technique>,
    pub bonus: Option<i32>,
    pub metadata: DieMetadata,
}

impl DiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        DiceOptions {
            metadata: config.die_metadata(),
            ..Self::default()
        }
    }

    pub fn technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    pub fn bonus(mut self, bonus: i32) -> Self {
        self.bonus = Some(bonus);
        self
    }

    /// Sets the bonus from anything integer-like.
    pub fn try_bonus<T: IntegerLike + ?Sized>(mut self, bonus: &T) -> Result<Self, DiceError> {
        self.bonus = Some(parse_i32("bonus", bonus)?);
        Ok(self)
    }

    pub fn metadata(mut self, metadata: DieMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn damage_type(mut self, damage_type: impl Into<String>) -> Self {
        self.metadata.damage_type = Some(damage_type.into());
        self
    }
}

/// Dice of one size rolled together, plus a flat bonus.
///
/// Dice stay in the order they were rolled. [`DiceSet::highest`] and
/// [`DiceSet::lowest`] only change which of them count towards the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoIterator)]
pub struct DiceSet {
    sides: u32,
    #[into_iterator(owned, ref)]
    dice: Vec<Die>,
    bonus: i32,
    technique: Option<Technique>,
    metadata: DieMetadata,
}

impl DiceSet {
    pub fn new(
        sides: u32,
        count: u32,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<Self, DiceError> {
        let bonus = options.bonus.unwrap_or(0);
        check_roll_shape(sides, count, bonus)?;

        let dice = (0..count)
            .map(|_| Die::new(sides, options.technique, options.metadata.clone(), roller))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiceSet {
            sides,
            dice,
            bonus,
            technique: options.technique,
            metadata: options.metadata.clone(),
        })
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn count(&self) -> u32 {
        self.dice.len() as u32
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.dice.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.dice.iter()
    }

    pub fn bonus(&self) -> i32 {
        self.bonus
    }

    pub fn set_bonus<T: IntegerLike + ?Sized>(&mut self, bonus: &T) -> Result<(), DiceError> {
        let bonus = parse_i32("bonus", bonus)?;
        check_roll_shape(self.sides, self.count(), bonus)?;
        self.bonus = bonus;
        Ok(())
    }

    pub fn technique(&self) -> Option<Technique> {
        self.technique
    }

    /// Changes the technique recorded for the set. The dice keep their own.
    pub fn set_technique(&mut self, technique: Option<Technique>) {
        self.technique = technique;
    }

    pub fn metadata(&self) -> &DieMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DieMetadata {
        &mut self.metadata
    }

    /// Sum of the included dice plus the bonus.
    pub fn total(&self) -> i32 {
        let dice: i32 = self
            .dice
            .iter()
            .filter(|die| die.is_included())
            .map(|die| die.value() as i32)
            .sum();
        dice + self.bonus
    }

    /// Keeps the `n` highest dice. See [`DiceSet::keep`].
    pub fn highest(&mut self, n: Option<u32>) -> Result<&mut Self, DiceError> {
        self.keep(KeepMode::Highest, n)
    }

    /// Keeps the `n` lowest dice. See [`DiceSet::keep`].
    pub fn lowest(&mut self, n: Option<u32>) -> Result<&mut Self, DiceError> {
        self.keep(KeepMode::Lowest, n)
    }

    pub fn with_advantage(&mut self, n: Option<u32>) -> Result<&mut Self, DiceError> {
        self.highest(n)
    }

    pub fn with_disadvantage(&mut self, n: Option<u32>) -> Result<&mut Self, DiceError> {
        self.lowest(n)
    }

    /// Includes the first `n` dice by `mode` ordering and excludes the rest.
    ///
    /// Any previous selection is discarded first. `n` defaults to
    /// [`default_keep_count`] and may not exceed the number of dice.
    pub fn keep(&mut self, mode: KeepMode, n: Option<u32>) -> Result<&mut Self, DiceError> {
        let count = self.count();
        let n = n.unwrap_or_else(|| default_keep_count(count));
        if n > count {
            return Err(DiceError::KeepExceedsDice {
                requested: n,
                available: count,
            });
        }

        for die in &mut self.dice {
            die.set_included(true);
        }

        let mut order: Vec<usize> = (0..self.dice.len()).collect();
        match mode {
            KeepMode::Lowest => {
                order.sort_by(|&a, &b| compare_by_value(&self.dice[a], &self.dice[b]))
            }
            KeepMode::Highest => {
                order.sort_by(|&a, &b| compare_by_value(&self.dice[b], &self.dice[a]))
            }
        }
        for (rank, index) in order.into_iter().enumerate() {
            self.dice[index].set_included(rank < n as usize);
        }

        Ok(self)
    }

    /// Rolls every die again and includes all of them.
    pub fn reroll_all(&mut self, roller: &mut Roller) -> Result<&mut Self, DiceError> {
        for die in &mut self.dice {
            die.roll(roller)?;
            die.set_included(true);
        }
        Ok(self)
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{}d{}: [", self.count(), self.sides)?;
        for (i, die) in self.dice.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            die.pretty_print(f)?;
        }
        write!(f, "]")?;
        if self.bonus > 0 {
            write!(f, " +{}", self.bonus)?;
        } else if self.bonus < 0 {
            write!(f, " {}", self.bonus)?;
        }
        write!(f, " = {}", self.total())
    }
}

impl Totaled for DiceSet {
    fn total(&self) -> i32 {
        DiceSet::total(self)
    }
}

impl Totaled for i32 {
    fn total(&self) -> i32 {
        *self
    }
}

/// Rolls `count` dice and returns their sum plus any bonus, without keeping
/// any [`Die`] around.
pub fn total_dice(
    sides: u32,
    count: u32,
    options: &DiceOptions,
    roller: &mut Roller,
) -> Result<i32, DiceError> {
    let bonus = options.bonus.unwrap_or(0);
    check_roll_shape(sides, count, bonus)?;
    let mut total = 0i32;
    for _ in 0..count {
        total += roller.roll(sides, options.technique)? as i32;
    }
    Ok(total + bonus)
}

/// Rejects an empty roll, and any roll whose total could exceed `i32::MAX`.
///
/// Holds for every later selection or reroll too, since the dice sum stays
/// within `0..=count * sides`. A negative bonus can never underflow.
fn check_roll_shape(sides: u32, count: u32, bonus: i32) -> Result<(), DiceError> {
    if count == 0 {
        return Err(DiceError::NotPositive {
            what: "number of dice",
            value: 0,
        });
    }
    let largest = i64::from(count)
        .checked_mul(i64::from(sides))
        .and_then(|dice| dice.checked_add(i64::from(bonus.max(0))));
    match largest {
        Some(largest) if largest <= i64::from(i32::MAX) => Ok(()),
        _ => Err(DiceError::TotalOutOfRange {
            sides,
            count,
            bonus,
        }),
    }
}
