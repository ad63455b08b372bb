use std::{cell::RefCell, num::NonZeroU32};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::DiceError, randomness::Technique};

thread_local! {
    static DEFAULT_ROLLER: RefCell<Roller> = RefCell::new(Roller::new());
}

/// Runs `f` against this thread's default [`Roller`].
///
/// The default roller is created on first use. Calling this again from
/// inside `f` panics, since the roller is already mutably borrowed.
pub fn with_default_roller<R>(f: impl FnOnce(&mut Roller) -> R) -> R {
    DEFAULT_ROLLER.with(|roller| f(&mut roller.borrow_mut()))
}

#[derive(Debug, Clone)]
struct SeededRng {
    seed: u64,
    rng: StdRng,
}

impl SeededRng {
    fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        SeededRng {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Which generator a single roll draws from, after `RandomEachCall` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Secure,
    Global,
    Instance,
}

/// Options for [`Roller::reseed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReseedOptions {
    /// Technique to reseed instead of the roller's default.
    pub technique: Option<Technique>,
    pub global_seed: Option<u64>,
    pub instance_seed: Option<u64>,
}

impl ReseedOptions {
    pub fn technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    pub fn global_seed(mut self, seed: u64) -> Self {
        self.global_seed = Some(seed);
        self
    }

    pub fn instance_seed(mut self, seed: u64) -> Self {
        self.instance_seed = Some(seed);
        self
    }
}

/// Seeds that were in effect before a reseed.
///
/// A field is `None` when its generator was not touched by the reseed, or,
/// for the instance generator, when it had not been created yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacedSeeds {
    pub seeded_global: Option<u64>,
    pub seeded_instance: Option<u64>,
}

/// Randomness context behind every die roll.
///
/// Holds the default [`Technique`], the two seedable generators and the
/// reseed counter. Rolls made through one roller never affect another.
#[derive(Debug, Clone)]
pub struct Roller {
    technique: Technique,
    reseed_interval: Option<NonZeroU32>,
    count_since_last_reseed: u32,
    global: SeededRng,
    instance: Option<SeededRng>,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Roller {
            technique: Technique::default(),
            reseed_interval: None,
            count_since_last_reseed: 0,
            global: SeededRng::new(None),
            instance: None,
        }
    }

    /// A roller whose seedable generators both start from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Roller {
            global: SeededRng::new(Some(seed)),
            instance: Some(SeededRng::new(Some(seed))),
            ..Roller::new()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut roller = Roller::new();
        roller.apply_config(config);
        roller
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.technique = config.technique();
        self.reseed_interval = config.reseed_interval();
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn set_technique(&mut self, technique: Technique) {
        self.technique = technique;
    }

    pub fn reseed_interval(&self) -> Option<NonZeroU32> {
        self.reseed_interval
    }

    pub fn set_reseed_interval(&mut self, interval: Option<NonZeroU32>) {
        self.reseed_interval = interval;
    }

    pub fn count_since_last_reseed(&self) -> u32 {
        self.count_since_last_reseed
    }

    pub fn global_seed(&self) -> u64 {
        self.global.seed
    }

    /// `None` until something rolls with, or reseeds, the instance generator.
    pub fn instance_seed(&self) -> Option<u64> {
        self.instance.as_ref().map(|instance| instance.seed)
    }

    /// Rolls a single die with `sides` faces.
    ///
    /// `technique` overrides the roller's default for this roll only.
    pub fn roll(&mut self, sides: u32, technique: Option<Technique>) -> Result<u32, DiceError> {
        let die = Uniform::new_inclusive(1, sides).map_err(|_| DiceError::NotPositive {
            what: "number of sides",
            value: i64::from(sides),
        })?;

        let value = match self.source(technique.unwrap_or(self.technique)) {
            Source::Secure => die.sample(&mut rand::rng()),
            Source::Global => die.sample(&mut self.global.rng),
            Source::Instance => die.sample(
                &mut self
                    .instance
                    .get_or_insert_with(|| SeededRng::new(None))
                    .rng,
            ),
        };

        self.count_since_last_reseed += 1;
        if let Some(interval) = self.reseed_interval
            && self.count_since_last_reseed >= interval.get()
        {
            log::debug!(
                "Reseed interval of {} reached, reseeding {}",
                interval,
                self.technique
            );
            self.reseed(ReseedOptions::default());
        }

        Ok(value)
    }

    /// Replaces the seed of the default (or requested) technique's generator.
    ///
    /// The reseed counter is reset in every case. Returns `None` for
    /// [`Technique::Secure`], which has no seed to report.
    pub fn reseed(&mut self, options: ReseedOptions) -> Option<DisplacedSeeds> {
        let technique = options.technique.unwrap_or(self.technique);
        self.count_since_last_reseed = 0;

        let mut displaced = DisplacedSeeds::default();
        match technique {
            Technique::Secure => return None,
            Technique::SeededGlobal => {
                displaced.seeded_global = Some(self.reseed_global(options.global_seed));
            }
            Technique::SeededInstance => {
                displaced.seeded_instance = self.reseed_instance(options.instance_seed);
            }
            Technique::RandomEachCall => {
                displaced.seeded_global = Some(self.reseed_global(options.global_seed));
                displaced.seeded_instance = self.reseed_instance(options.instance_seed);
            }
        }
        log::trace!("Reseeded {technique}, displaced {displaced:?}");
        Some(displaced)
    }

    fn reseed_global(&mut self, seed: Option<u64>) -> u64 {
        std::mem::replace(&mut self.global, SeededRng::new(seed)).seed
    }

    fn reseed_instance(&mut self, seed: Option<u64>) -> Option<u64> {
        self.instance
            .replace(SeededRng::new(seed))
            .map(|previous| previous.seed)
    }

    fn source(&self, technique: Technique) -> Source {
        let technique = match technique {
            Technique::RandomEachCall => {
                let index = rand::rng().random_range(0..Technique::CONCRETE.len());
                Technique::CONCRETE[index]
            }
            other => other,
        };
        match technique {
            Technique::Secure => Source::Secure,
            Technique::SeededGlobal => Source::Global,
            Technique::SeededInstance | Technique::RandomEachCall => Source::Instance,
        }
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_range_for_every_technique() {
        let mut roller = Roller::test_rng();
        for technique in Technique::ALL {
            for _ in 0..1000 {
                let value = roller.roll(6, Some(technique)).unwrap();
                assert!((1..=6).contains(&value));
            }
        }
    }

    #[test]
    fn test_roll_zero_sides() {
        let mut roller = Roller::test_rng();
        assert!(matches!(
            roller.roll(0, None),
            Err(DiceError::NotPositive { .. })
        ));
        assert_eq!(roller.count_since_last_reseed(), 0);
    }

    #[test]
    fn test_one_sided_die() {
        let mut roller = Roller::test_rng();
        assert_eq!(roller.roll(1, None).unwrap(), 1);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Roller::from_seed(1337);
        let mut b = Roller::from_seed(1337);
        for technique in [Technique::SeededGlobal, Technique::SeededInstance] {
            let left: Vec<u32> = (0..20).map(|_| a.roll(20, Some(technique)).unwrap()).collect();
            let right: Vec<u32> = (0..20).map(|_| b.roll(20, Some(technique)).unwrap()).collect();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_counter_increments() {
        let mut roller = Roller::test_rng();
        for expected in 1..=5 {
            roller.roll(20, None).unwrap();
            assert_eq!(roller.count_since_last_reseed(), expected);
        }
    }

    #[test]
    fn test_reseed_interval_resets_counter() {
        let mut roller = Roller::test_rng();
        roller.set_technique(Technique::SeededGlobal);
        roller.set_reseed_interval(NonZeroU32::new(3));
        let seed_before = roller.global_seed();

        roller.roll(20, None).unwrap();
        roller.roll(20, None).unwrap();
        assert_eq!(roller.count_since_last_reseed(), 2);
        assert_eq!(roller.global_seed(), seed_before);

        roller.roll(20, None).unwrap();
        assert_eq!(roller.count_since_last_reseed(), 0);
    }

    #[test]
    fn test_reseed_secure_returns_nothing() {
        let mut roller = Roller::test_rng();
        roller.set_technique(Technique::Secure);
        roller.roll(20, None).unwrap();
        assert_eq!(roller.reseed(ReseedOptions::default()), None);
        assert_eq!(roller.count_since_last_reseed(), 0);

        roller.set_technique(Technique::SeededGlobal);
        roller.roll(20, None).unwrap();
        let options = ReseedOptions::default().technique(Technique::Secure);
        assert_eq!(roller.reseed(options), None);
        assert_eq!(roller.count_since_last_reseed(), 0);
    }

    #[test]
    fn test_reseed_global_returns_prior_seed() {
        let mut roller = Roller::from_seed(24_601);
        let options = ReseedOptions::default()
            .technique(Technique::SeededGlobal)
            .global_seed(10_642);
        let displaced = roller.reseed(options).unwrap();
        assert_eq!(displaced.seeded_global, Some(24_601));
        assert_eq!(displaced.seeded_instance, None);
        assert_eq!(roller.global_seed(), 10_642);
        assert_eq!(roller.instance_seed(), Some(24_601));
    }

    #[test]
    fn test_reseed_instance_before_creation() {
        let mut roller = Roller::new();
        assert_eq!(roller.instance_seed(), None);
        let options = ReseedOptions::default()
            .technique(Technique::SeededInstance)
            .instance_seed(7_331);
        assert_eq!(roller.reseed(options), Some(DisplacedSeeds::default()));
        assert_eq!(roller.instance_seed(), Some(7_331));
    }

    #[test]
    fn test_reseed_random_each_call_touches_both() {
        let mut roller = Roller::from_seed(1_337);
        let options = ReseedOptions::default()
            .technique(Technique::RandomEachCall)
            .global_seed(1)
            .instance_seed(2);
        let displaced = roller.reseed(options).unwrap();
        assert_eq!(
            displaced,
            DisplacedSeeds {
                seeded_global: Some(1_337),
                seeded_instance: Some(1_337),
            }
        );
        assert_eq!(roller.global_seed(), 1);
        assert_eq!(roller.instance_seed(), Some(2));
    }

    #[test]
    fn test_reseed_leaves_other_generator_alone() {
        let mut untouched = Roller::from_seed(99);
        let mut reseeded = Roller::from_seed(99);
        reseeded.reseed(
            ReseedOptions::default()
                .technique(Technique::SeededGlobal)
                .global_seed(5),
        );

        for _ in 0..20 {
            assert_eq!(
                untouched.roll(100, Some(Technique::SeededInstance)).unwrap(),
                reseeded.roll(100, Some(Technique::SeededInstance)).unwrap()
            );
        }
    }

    #[test]
    fn test_default_roller_persists_between_calls() {
        with_default_roller(|roller| {
            roller.reseed(ReseedOptions::default());
            roller.roll(4, None).unwrap();
        });
        let count = with_default_roller(|roller| roller.count_since_last_reseed());
        assert_eq!(count, 1);
    }
}
