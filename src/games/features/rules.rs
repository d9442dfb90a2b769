use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::CardId;
use crate::error::ConfigError;
use crate::rules::{Triple, TripleRules};

/// Values each feature can take.
const FEATURE_VALUES: u16 = 3;

/// Most features whose deck still fits `u16` card ids.
pub const MAX_FEATURES: u32 = 10;

/// Feature-matching rules.
///
/// ```
/// use triple_rush::core::CardId;
/// use triple_rush::games::FeatureRules;
/// use triple_rush::rules::TripleRules;
///
/// let rules = FeatureRules::new(4);
/// assert_eq!(rules.deck_size(), Some(81));
///
/// // 0 = (0,0,0,0), 1 = (1,0,0,0), 2 = (2,0,0,0): first feature all different, rest all equal.
/// assert!(rules.is_valid_triple([CardId(0), CardId(1), CardId(2)]));
/// // 0, 1, 3 = (0,1,0,0): first feature has two 0s and a 1.
/// assert!(!rules.is_valid_triple([CardId(0), CardId(1), CardId(3)]));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureRules {
    feature_count: u32,
}

impl FeatureRules {
    /// Rules for cards with `feature_count` three-valued features.
    ///
    /// # Panics
    ///
    /// If `feature_count` is zero or above [`MAX_FEATURES`]; use
    /// [`FeatureRules::try_new`] for untrusted input.
    pub fn new(feature_count: u32) -> Self {
        match Self::try_new(feature_count) {
            Ok(rules) => rules,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(feature_count: u32) -> Result<Self, ConfigError> {
        if feature_count == 0 || feature_count > MAX_FEATURES {
            return Err(ConfigError::FeatureCount {
                got: feature_count,
                max: MAX_FEATURES,
            });
        }
        Ok(Self { feature_count })
    }

    #[must_use]
    pub fn feature_count(&self) -> u32 {
        self.feature_count
    }

    /// Feature values of `card`, least significant feature first.
    #[must_use]
    pub fn features(&self, card: CardId) -> SmallVec<[u16; 8]> {
        let mut id = card.0;
        (0..self.feature_count)
            .map(|_| {
                let value = id % FEATURE_VALUES;
                id /= FEATURE_VALUES;
                value
            })
            .collect()
    }

    /// The unique card completing a triple with `a` and `b`.
    #[must_use]
    pub fn third_card(&self, a: CardId, b: CardId) -> CardId {
        let fa = self.features(a);
        let fb = self.features(b);

        let mut id = 0u16;
        for feature in (0..self.feature_count as usize).rev() {
            // All equal or all different: the three values sum to 0 mod 3.
            let value = (2 * FEATURE_VALUES - fa[feature] - fb[feature]) % FEATURE_VALUES;
            id = id * FEATURE_VALUES + value;
        }
        CardId(id)
    }
}

impl TripleRules for FeatureRules {
    fn deck_size(&self) -> Option<usize> {
        Some(FEATURE_VALUES.pow(self.feature_count) as usize)
    }

    fn is_valid_triple(&self, cards: [CardId; 3]) -> bool {
        let [a, b, c] = cards;
        if a == b || b == c || a == c {
            return false;
        }

        let fa = self.features(a);
        let fb = self.features(b);
        let fc = self.features(c);

        (0..self.feature_count as usize).all(|i| (fa[i] + fb[i] + fc[i]) % FEATURE_VALUES == 0)
    }

    fn find_triples(&self, cards: &[CardId], limit: usize) -> Vec<Triple> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }

        let position: FxHashMap<CardId, usize> =
            cards.iter().enumerate().map(|(i, &card)| (card, i)).collect();

        for i in 0..cards.len() {
            for j in (i + 1)..cards.len() {
                let third = self.third_card(cards[i], cards[j]);
                // Only count each triple from its two lowest positions.
                if position.get(&third).is_some_and(|&k| k > j) {
                    found.push(Triple::new(cards[i], cards[j], third));
                    if found.len() >= limit {
                        return found;
                    }
                }
            }
        }

        found
    }
}

impl Default for FeatureRules {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count_bounds() {
        assert!(matches!(
            FeatureRules::try_new(0),
            Err(ConfigError::FeatureCount { got: 0, max: MAX_FEATURES })
        ));
        assert!(matches!(
            FeatureRules::try_new(MAX_FEATURES + 1),
            Err(ConfigError::FeatureCount { got: 11, .. })
        ));

        let largest = FeatureRules::try_new(MAX_FEATURES).unwrap();
        assert_eq!(largest.deck_size(), Some(59_049));
        assert!(largest.is_valid_triple([CardId(0), CardId(1), CardId(2)]));
    }

    #[test]
    fn test_features_decode() {
        let rules = FeatureRules::new(4);
        // 5 = 2 + 1*3
        assert_eq!(rules.features(CardId(5)).as_slice(), &[2, 1, 0, 0]);
        assert_eq!(rules.features(CardId(80)).as_slice(), &[2, 2, 2, 2]);
    }

    #[test]
    fn test_third_card_completes_triple() {
        let rules = FeatureRules::new(4);
        for a in CardId::all(81).step_by(7) {
            for b in CardId::all(81).step_by(11) {
                if a == b {
                    continue;
                }
                let c = rules.third_card(a, b);
                assert!(rules.is_valid_triple([a, b, c]), "{a} {b} {c}");
            }
        }
    }

    #[test]
    fn test_duplicate_cards_never_match() {
        let rules = FeatureRules::new(4);
        assert!(!rules.is_valid_triple([CardId(4), CardId(4), CardId(4)]));
    }

    #[test]
    fn test_order_does_not_matter() {
        let rules = FeatureRules::new(4);
        let (a, b) = (CardId(10), CardId(47));
        let c = rules.third_card(a, b);
        assert!(rules.is_valid_triple([c, a, b]));
        assert!(rules.is_valid_triple([b, c, a]));
    }

    #[test]
    fn test_find_triples_agrees_with_brute_force() {
        let rules = FeatureRules::new(3);
        let cards: Vec<_> = CardId::all(27).step_by(2).collect();

        let fast = rules.find_triples(&cards, usize::MAX).len();
        let mut slow = 0;
        for i in 0..cards.len() {
            for j in (i + 1)..cards.len() {
                for k in (j + 1)..cards.len() {
                    if rules.is_valid_triple([cards[i], cards[j], cards[k]]) {
                        slow += 1;
                    }
                }
            }
        }
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_full_deck_triple_count() {
        // Every pair determines exactly one third card: 81*80/6 triples.
        let rules = FeatureRules::new(4);
        let cards: Vec<_> = CardId::all(81).collect();
        assert_eq!(rules.find_triples(&cards, usize::MAX).len(), 1080);
    }
}
