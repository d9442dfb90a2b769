//! Rules trait and winner computation.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};

/// Three cards claimed together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple(pub [CardId; 3]);

impl Triple {
    #[must_use]
    pub fn new(a: CardId, b: CardId, c: CardId) -> Self {
        Self([a, b, c])
    }

    #[must_use]
    pub fn cards(&self) -> [CardId; 3] {
        self.0
    }

    /// Whether `card` is one of the three.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.0.contains(&card)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0].0, self.0[1].0, self.0[2].0)
    }
}

/// Pure matching rules shared by the dealer thread and diagnostics.
///
/// ## Implementation Notes
///
/// - `is_valid_triple` must not depend on card order
/// - `find_triples` returns at most `limit` triples, each drawn from `cards`
///   with three distinct cards
pub trait TripleRules: Send + Sync {
    /// Do these three cards form a valid triple?
    fn is_valid_triple(&self, cards: [CardId; 3]) -> bool;

    /// Find up to `limit` valid triples among `cards`.
    ///
    /// Default implementation checks every combination.
    fn find_triples(&self, cards: &[CardId], limit: usize) -> Vec<Triple> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }

        for i in 0..cards.len() {
            for j in (i + 1)..cards.len() {
                for k in (j + 1)..cards.len() {
                    let triple = [cards[i], cards[j], cards[k]];
                    if self.is_valid_triple(triple) {
                        found.push(Triple(triple));
                        if found.len() >= limit {
                            return found;
                        }
                    }
                }
            }
        }

        found
    }

    /// Number of card ids these rules understand, if bounded.
    ///
    /// A game refuses a deck of any other size.
    fn deck_size(&self) -> Option<usize> {
        None
    }

    /// Does at least one valid triple exist among `cards`?
    fn has_triple(&self, cards: &[CardId]) -> bool {
        !self.find_triples(cards, 1).is_empty()
    }
}

/// Rules backed by a plain predicate.
///
/// ```
/// use triple_rush::core::CardId;
/// use triple_rush::rules::{PredicateRules, TripleRules};
///
/// // Three consecutive card numbers match.
/// let rules = PredicateRules::new(|cards: [CardId; 3]| {
///     let mut ids = cards.map(|c| c.0);
///     ids.sort();
///     ids[1] == ids[0] + 1 && ids[2] == ids[1] + 1
/// });
///
/// assert!(rules.is_valid_triple([CardId(5), CardId(3), CardId(4)]));
/// assert_eq!(rules.find_triples(&[CardId(0), CardId(1), CardId(2), CardId(9)], 10).len(), 1);
/// ```
pub struct PredicateRules<F> {
    predicate: F,
}

impl<F> PredicateRules<F>
where
    F: Fn([CardId; 3]) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> TripleRules for PredicateRules<F>
where
    F: Fn([CardId; 3]) -> bool + Send + Sync,
{
    fn is_valid_triple(&self, cards: [CardId; 3]) -> bool {
        (self.predicate)(cards)
    }
}

impl<F> std::fmt::Debug for PredicateRules<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateRules").finish_non_exhaustive()
    }
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Several players share the top score.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Every player whose score equals the maximum wins.
    ///
    /// Returns `None` if there are no players.
    pub fn from_scores(scores: impl IntoIterator<Item = (PlayerId, u32)>) -> Option<Self> {
        let scores: Vec<_> = scores.into_iter().collect();
        let best = scores.iter().map(|&(_, score)| score).max()?;

        let mut winners: Vec<PlayerId> = scores
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(player, _)| player)
            .collect();

        if winners.len() == 1 {
            Some(GameResult::Winner(winners[0]))
        } else {
            winners.sort();
            Some(GameResult::Winners(winners))
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }

    /// Winners in id order.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner(p) => vec![*p],
            GameResult::Winners(ps) => ps.clone(),
        }
    }
}
