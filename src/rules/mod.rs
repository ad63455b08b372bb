pub mod ability_scores;
pub mod dice_set;
pub mod die;
pub mod roll_spec;
