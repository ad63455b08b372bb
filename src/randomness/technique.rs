use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiceError;

/// The number source backing a die roll.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    /// Operating system backed generator. Never seeded, never reports a seed.
    Secure,
    /// Generator shared by every roll on a [`Roller`](super::Roller) that asks for it.
    #[serde(alias = "seeded_global")]
    SeededGlobal,
    /// Lazily created generator that is replaced wholesale on reseed.
    #[default]
    #[serde(alias = "seeded_instance")]
    SeededInstance,
    /// Picks one of the other three for every single roll.
    #[serde(alias = "random_each_call")]
    RandomEachCall,
}

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Secure,
        Technique::SeededGlobal,
        Technique::SeededInstance,
        Technique::RandomEachCall,
    ];

    /// Techniques that name an actual generator.
    pub const CONCRETE: [Technique; 3] = [
        Technique::Secure,
        Technique::SeededGlobal,
        Technique::SeededInstance,
    ];

    pub const NAMES: [&'static str; 4] =
        ["secure", "seeded-global", "seeded-instance", "random-each-call"];

    pub fn name(&self) -> &'static str {
        match self {
            Technique::Secure => "secure",
            Technique::SeededGlobal => "seeded-global",
            Technique::SeededInstance => "seeded-instance",
            Technique::RandomEachCall => "random-each-call",
        }
    }

    pub fn is_seedable(&self) -> bool {
        !matches!(self, Technique::Secure)
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Technique {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Technique::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| DiceError::UnknownTechnique(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("secure".parse::<Technique>(), Ok(Technique::Secure));
        assert_eq!("seeded_global".parse::<Technique>(), Ok(Technique::SeededGlobal));
        assert_eq!("Seeded-Instance".parse::<Technique>(), Ok(Technique::SeededInstance));
        assert_eq!(
            "random-each-call".parse::<Technique>(),
            Ok(Technique::RandomEachCall)
        );
        assert_eq!(
            "evil_hacker_random".parse::<Technique>(),
            Err(DiceError::UnknownTechnique("evil_hacker_random".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Technique::RandomEachCall).unwrap();
        assert_eq!(json, "\"random-each-call\"");
        let parsed: Technique = serde_json::from_str("\"seeded_global\"").unwrap();
        assert_eq!(parsed, Technique::SeededGlobal);
    }

    #[test]
    fn test_only_secure_is_unseedable() {
        for technique in Technique::ALL {
            assert_eq!(technique.is_seedable(), technique != Technique::Secure);
        }
    }
}
