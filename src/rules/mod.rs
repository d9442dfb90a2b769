//! Triple-matching rules.
//!
//! The dealer never interprets cards itself: it asks a [`TripleRules`]
//! implementation whether three cards match and which triples exist among
//! a set of cards. Games plug in their own predicate.

pub mod engine;

pub use engine::{GameResult, PredicateRules, Triple, TripleRules};
