use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::DiceError,
    randomness::Roller,
    rules::dice_set::{DiceOptions, DiceSet, Totaled},
};

/// Ability score shape for one call. Unset fields fall back to the [`Config`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoreRequest {
    pub array_size: Option<u32>,
    pub sides: Option<u32>,
    pub dice_rolled: Option<u32>,
    pub dice_kept: Option<u32>,
}

impl AbilityScoreRequest {
    pub fn array_size(mut self, array_size: u32) -> Self {
        self.array_size = Some(array_size);
        self
    }

    pub fn sides(mut self, sides: u32) -> Self {
        self.sides = Some(sides);
        self
    }

    pub fn dice_rolled(mut self, dice_rolled: u32) -> Self {
        self.dice_rolled = Some(dice_rolled);
        self
    }

    pub fn dice_kept(mut self, dice_kept: u32) -> Self {
        self.dice_kept = Some(dice_kept);
        self
    }
}

/// Rolls arrays of ability scores, e.g. six times "4d6 keep the highest 3".
#[derive(Debug, Clone, Copy)]
pub struct AbilityScoreGenerator<'a> {
    config: &'a Config,
}

impl<'a> AbilityScoreGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        request: AbilityScoreRequest,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<Vec<DiceSet>, DiceError> {
        let array_size = request
            .array_size
            .unwrap_or(self.config.ability_score_array_size());
        let sides = request.sides.unwrap_or(self.config.ability_score_sides());
        let dice_rolled = request
            .dice_rolled
            .unwrap_or(self.config.ability_score_dice_rolled());
        let dice_kept = request
            .dice_kept
            .unwrap_or(self.config.ability_score_dice_kept());

        log::debug!(
            "Rolling {array_size} ability scores of {dice_rolled}d{sides} keep highest {dice_kept}"
        );

        (0..array_size)
            .map(|_| -> Result<DiceSet, DiceError> {
                let mut dice = DiceSet::new(sides, dice_rolled, options, roller)?;
                dice.highest(Some(dice_kept))?;
                Ok(dice)
            })
            .collect()
    }

    pub fn totals(
        &self,
        request: AbilityScoreRequest,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<Vec<i32>, DiceError> {
        Ok(harvest_totals(&self.generate(request, options, roller)?))
    }
}

/// Collects the total of every item.
pub fn harvest_totals<'a, T, I>(items: I) -> Vec<i32>
where
    T: Totaled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Totaled::total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, randomness::Technique};

    #[test]
    fn test_default_shape() {
        let config = Config::default();
        let mut roller = Roller::test_rng();
        let scores = AbilityScoreGenerator::new(&config)
            .generate(AbilityScoreRequest::default(), &DiceOptions::new(), &mut roller)
            .unwrap();
        assert_eq!(scores.len(), 6);
        for score in &scores {
            assert_eq!(score.sides(), 6);
            assert_eq!(score.count(), 4);
            assert_eq!(score.iter().filter(|die| die.is_included()).count(), 3);
            assert!((3..=18).contains(&score.total()));
        }
    }

    #[test]
    fn test_request_overrides_each_field() {
        let config = Config::default();
        let mut roller = Roller::test_rng();
        let request = AbilityScoreRequest::default()
            .array_size(7)
            .sides(8)
            .dice_rolled(5)
            .dice_kept(4);
        let options = DiceOptions::new()
            .technique(Technique::RandomEachCall)
            .damage_type("psychic");
        let scores = AbilityScoreGenerator::new(&config)
            .generate(request, &options, &mut roller)
            .unwrap();
        assert_eq!(scores.len(), 7);
        for score in &scores {
            assert_eq!(score.sides(), 8);
            assert_eq!(score.count(), 5);
            assert_eq!(score.iter().filter(|die| die.is_included()).count(), 4);
            assert_eq!(score.technique(), Some(Technique::RandomEachCall));
            assert_eq!(score.metadata().damage_type.as_deref(), Some("psychic"));
        }

        // only the array size overridden, the rest comes from the config
        let scores = AbilityScoreGenerator::new(&config)
            .generate(
                AbilityScoreRequest::default().array_size(2),
                &DiceOptions::new(),
                &mut roller,
            )
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|score| score.count() == 4));
    }

    #[test]
    fn test_uses_config_defaults() {
        let mut config = Config::default();
        config.set_ability_score_array_size(&3).unwrap();
        config.set_ability_score_sides(&1).unwrap();
        let mut roller = Roller::test_rng();
        let totals = AbilityScoreGenerator::new(&config)
            .totals(AbilityScoreRequest::default(), &DiceOptions::new(), &mut roller)
            .unwrap();
        assert_eq!(totals, vec![3, 3, 3]);
    }

    #[test]
    fn test_totals_match_generate() {
        let config = Config::default();
        let generator = AbilityScoreGenerator::new(&config);
        let mut a = Roller::from_seed(24_601);
        let mut b = Roller::from_seed(24_601);
        let sets = generator
            .generate(AbilityScoreRequest::default(), &DiceOptions::new(), &mut a)
            .unwrap();
        let totals = generator
            .totals(AbilityScoreRequest::default(), &DiceOptions::new(), &mut b)
            .unwrap();
        assert_eq!(harvest_totals(&sets), totals);
    }

    #[test]
    fn test_kept_more_than_rolled() {
        let config = Config::default();
        let mut roller = Roller::test_rng();
        let request = AbilityScoreRequest::default().dice_rolled(3).dice_kept(4);
        let err = AbilityScoreGenerator::new(&config)
            .generate(request, &DiceOptions::new(), &mut roller)
            .unwrap_err();
        assert_eq!(
            err,
            DiceError::KeepExceedsDice {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_harvest_totals() {
        assert_eq!(harvest_totals(&[5, 5]), vec![5, 5]);
        let empty: Vec<DiceSet> = Vec::new();
        assert!(harvest_totals(&empty).is_empty());
    }
}
