//! Feature-matching rules, the classic game.
//!
//! Each card is a combination of `feature_count` features, each taking one of
//! three values. Three cards match when, for every feature, their values are
//! all equal or all different.
//!
//! Card ids encode features as base-3 digits, least significant first, so a
//! deck for `feature_count` features has exactly `3^feature_count` cards.

mod rules;

pub use rules::{FeatureRules, MAX_FEATURES};
