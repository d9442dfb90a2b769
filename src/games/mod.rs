//! Concrete rule sets.

pub mod features;

pub use features::FeatureRules;
