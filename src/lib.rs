pub mod config;
pub mod error;
pub mod randomness;
pub mod resolver;
pub mod roll_parser;
pub mod rules;
pub mod utils;

pub mod prelude {
    pub use crate::{
        config::Config,
        error::{DiceError, ErrorKind},
        randomness::{DisplacedSeeds, ReseedOptions, Roller, Technique, with_default_roller},
        resolver::{BoundRoll, Resolver, with_default_resolver},
        rules::{
            ability_scores::{AbilityScoreGenerator, AbilityScoreRequest, harvest_totals},
            dice_set::{DiceOptions, DiceSet, KeepMode, Totaled, total_dice},
            die::{Die, DieMetadata},
            roll_spec::{Action, RollOutcome, RollSpec},
        },
    };
}

use crate::prelude::*;

/// Calls a roll identifier such as `total_4d6_highest3` with this thread's
/// default resolver and roller.
pub fn call(identifier: &str, options: &DiceOptions) -> Result<RollOutcome, DiceError> {
    with_default_resolver(|resolver| {
        with_default_roller(|roller| resolver.call(identifier, options, roller))
    })
}

/// Whether [`call`] would accept `identifier`.
pub fn responds_to(identifier: &str) -> bool {
    with_default_resolver(|resolver| resolver.responds_to(identifier))
}
