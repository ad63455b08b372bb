use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::{
    error::DiceError,
    randomness::Roller,
    roll_parser,
    rules::{
        dice_set::DiceOptions,
        roll_spec::{RollOutcome, RollSpec},
    },
};

thread_local! {
    static DEFAULT_RESOLVER: RefCell<Resolver> = RefCell::new(Resolver::new());
}

/// Runs `f` against this thread's default [`Resolver`].
pub fn with_default_resolver<R>(f: impl FnOnce(&mut Resolver) -> R) -> R {
    DEFAULT_RESOLVER.with(|resolver| f(&mut resolver.borrow_mut()))
}

/// An identifier that has been parsed once and can be called any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRoll {
    identifier: String,
    spec: RollSpec,
}

impl BoundRoll {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn spec(&self) -> &RollSpec {
        &self.spec
    }

    pub fn call(
        &self,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<RollOutcome, DiceError> {
        log::trace!("Calling {}", self.identifier);
        self.spec.invoke(options, roller)
    }
}

/// Resolves roll identifiers like `roll_4d6_highest3` to bound rolls.
///
/// Each distinct identifier is parsed at most once; afterwards it is served
/// from the cache, which only ever grows.
#[derive(Debug, Default)]
pub struct Resolver {
    bound: FxHashMap<String, BoundRoll>,
    parse_count: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `identifier` up, parsing it on first sight.
    ///
    /// `None` means the identifier is not a roll identifier.
    pub fn resolve(&mut self, identifier: &str) -> Option<&BoundRoll> {
        if !self.bound.contains_key(identifier) {
            self.parse_count += 1;
            let spec = roll_parser::parse_identifier(identifier)?;
            log::debug!("Resolved {identifier} to {spec:?}");
            self.bound.insert(
                identifier.to_string(),
                BoundRoll {
                    identifier: identifier.to_string(),
                    spec,
                },
            );
        }
        self.bound.get(identifier)
    }

    /// Resolves and calls `identifier`, failing with
    /// [`DiceError::NoSuchOperation`] when it is not a roll identifier.
    pub fn call(
        &mut self,
        identifier: &str,
        options: &DiceOptions,
        roller: &mut Roller,
    ) -> Result<RollOutcome, DiceError> {
        match self.resolve(identifier) {
            Some(bound) => bound.call(options, roller),
            None => Err(DiceError::NoSuchOperation(identifier.to_string())),
        }
    }

    /// Whether `identifier` would resolve. Does not populate the cache.
    pub fn responds_to(&self, identifier: &str) -> bool {
        self.bound.contains_key(identifier)
            || roll_parser::parse_identifier(identifier).is_some()
    }

    pub fn is_resolved(&self, identifier: &str) -> bool {
        self.bound.contains_key(identifier)
    }

    /// How many times [`Resolver::resolve`] has run the parser.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
