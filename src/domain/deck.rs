use super::{DeckPhase, DeckStatistics, Direction, Item};
use tracing::{debug, info};

/// A cursor move that has been decided but not yet shown.
///
/// Tagged with the deck generation it was issued for; applying it to any
/// other generation does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    pub generation: u64,
    pub to_cursor: usize,
}

/// Linear traversal over one fetched batch, plus the liked log.
#[derive(Debug, Default)]
pub struct Deck {
    items: Vec<Item>,
    cursor: usize,
    liked: Vec<Item>,
    exhausted: bool,
    generation: u64,
    /// Target cursor of the decision currently animating out
    pending: Option<usize>,
}

impl Deck {
    pub fn new(items: Vec<Item>) -> Self {
        let mut deck = Self::default();
        deck.load(items);
        deck
    }

    /// Replaces the batch and reinitialises all traversal state.
    ///
    /// Returns the new generation. Any advance scheduled before this call
    /// becomes stale.
    pub fn load(&mut self, items: Vec<Item>) -> u64 {
        self.generation += 1;
        self.items = items;
        self.cursor = 0;
        self.liked.clear();
        self.exhausted = false;
        self.pending = None;

        info!(
            generation = self.generation,
            items = self.items.len(),
            "Deck loaded"
        );
        self.generation
    }

    /// Same as [`Deck::load`] with a freshly fetched batch.
    pub fn reset(&mut self, items: Vec<Item>) -> u64 {
        self.load(items)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    pub fn peek_next_item(&self) -> Option<&Item> {
        self.items.get(self.cursor + 1)
    }

    pub fn liked_items(&self) -> &[Item] {
        &self.liked
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn phase(&self) -> DeckPhase {
        if self.exhausted {
            DeckPhase::Exhausted
        } else {
            DeckPhase::Browsing
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while the current card's decision is recorded but not yet shown
    pub fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a decision on the current card.
    ///
    /// The liked log and the exhaustion flag update immediately. The visible
    /// cursor does not move; the caller schedules the returned advance and
    /// hands it back to [`Deck::apply_advance`] once the exit animation ends.
    ///
    /// Returns `None` without touching state when there is no current card
    /// or the current card already has a decision in flight.
    pub fn decide(&mut self, direction: Direction) -> Option<ScheduledAdvance> {
        if self.pending.is_some() {
            debug!(cursor = self.cursor, "Decision already in flight, ignoring");
            return None;
        }

        let item = match self.items.get(self.cursor) {
            Some(item) => item,
            None => {
                debug!(?direction, "No current card, ignoring decision");
                return None;
            }
        };

        if direction == Direction::Right {
            self.liked.push(item.clone());
        }
        debug!(id = %item.id, ?direction, "Decision recorded");

        let to_cursor = self.cursor + 1;
        if to_cursor == self.items.len() {
            self.exhausted = true;
            info!(
                generation = self.generation,
                liked = self.liked.len(),
                total = self.items.len(),
                "Deck exhausted"
            );
        }
        self.pending = Some(to_cursor);

        Some(ScheduledAdvance {
            generation: self.generation,
            to_cursor,
        })
    }

    /// Moves the visible cursor for a previously scheduled advance.
    ///
    /// Returns false (and changes nothing) when the advance belongs to an
    /// older generation or does not match the decision in flight.
    pub fn apply_advance(&mut self, advance: ScheduledAdvance) -> bool {
        if advance.generation != self.generation {
            debug!(
                stale = advance.generation,
                current = self.generation,
                "Dropping advance from superseded deck"
            );
            return false;
        }
        if self.pending != Some(advance.to_cursor) {
            debug!(to = advance.to_cursor, "Dropping advance with no matching decision");
            return false;
        }

        self.cursor = advance.to_cursor;
        self.pending = None;
        true
    }

    pub fn statistics(&self) -> DeckStatistics {
        DeckStatistics {
            total: self.items.len(),
            decided: self.cursor + usize::from(self.pending.is_some()),
            liked: self.liked.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter()
            .map(|id| Item::new(*id, format!("https://cataas.com/cat/{}", id)))
            .collect()
    }

    fn liked_ids(deck: &Deck) -> Vec<&str> {
        deck.liked_items().iter().map(|i| i.id.as_str()).collect()
    }

    /// Decide and immediately apply the deferred advance
    fn decide_and_settle(deck: &mut Deck, direction: Direction) {
        let advance = deck.decide(direction).expect("decision accepted");
        assert!(deck.apply_advance(advance));
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_new_deck_starts_at_first_item() {
            let deck = Deck::new(items(&["a", "b"]));
            assert_eq!(deck.cursor(), 0);
            assert_eq!(deck.current_item().unwrap().id, "a");
            assert_eq!(deck.peek_next_item().unwrap().id, "b");
            assert!(!deck.is_exhausted());
            assert_eq!(deck.phase(), DeckPhase::Browsing);
        }

        #[test]
        fn test_load_empty_is_browsing_not_exhausted() {
            let mut deck = Deck::default();
            deck.load(vec![]);

            assert!(deck.current_item().is_none());
            assert!(deck.peek_next_item().is_none());
            assert!(!deck.is_exhausted());
            assert_eq!(deck.phase(), DeckPhase::Browsing);
        }

        #[test]
        fn test_load_bumps_generation() {
            let mut deck = Deck::default();
            let first = deck.load(items(&["a"]));
            let second = deck.load(items(&["b"]));
            assert!(second > first);
            assert_eq!(deck.generation(), second);
        }

        #[test]
        fn test_reset_clears_everything() {
            let mut deck = Deck::new(items(&["a", "b"]));
            decide_and_settle(&mut deck, Direction::Right);
            decide_and_settle(&mut deck, Direction::Right);
            assert!(deck.is_exhausted());

            deck.reset(items(&["c", "d", "e"]));

            assert_eq!(deck.cursor(), 0);
            assert!(deck.liked_items().is_empty());
            assert!(!deck.is_exhausted());
            assert!(!deck.has_pending_advance());
            assert_eq!(deck.current_item().unwrap().id, "c");
        }

        #[test]
        fn test_reset_mid_decision_clears_pending() {
            let mut deck = Deck::new(items(&["a", "b"]));
            deck.decide(Direction::Left).unwrap();
            assert!(deck.has_pending_advance());

            deck.reset(items(&["x"]));
            assert!(!deck.has_pending_advance());
            assert!(deck.decide(Direction::Right).is_some());
        }
    }

    mod decide_tests {
        use super::*;

        #[test]
        fn test_scenario_right_left_right() {
            let mut deck = Deck::new(items(&["A", "B", "C"]));

            decide_and_settle(&mut deck, Direction::Right);
            assert!(!deck.is_exhausted());
            decide_and_settle(&mut deck, Direction::Left);
            assert!(!deck.is_exhausted());
            decide_and_settle(&mut deck, Direction::Right);
            assert!(deck.is_exhausted());

            assert_eq!(liked_ids(&deck), vec!["A", "C"]);
            assert_eq!(deck.phase(), DeckPhase::Exhausted);
            assert!(deck.current_item().is_none());
        }

        #[test]
        fn test_exactly_n_decisions_exhaust() {
            for n in 1..=6 {
                let ids: Vec<String> = (0..n).map(|i| format!("cat{}", i)).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let mut deck = Deck::new(items(&refs));

                for call in 1..=n {
                    decide_and_settle(&mut deck, Direction::Left);
                    assert_eq!(deck.is_exhausted(), call == n, "n={} call={}", n, call);
                }
                assert_eq!(deck.cursor(), n);
            }
        }

        #[test]
        fn test_liked_preserves_decision_order() {
            let mut deck = Deck::new(items(&["a", "b", "c", "d"]));
            let choices = [
                Direction::Left,
                Direction::Right,
                Direction::Right,
                Direction::Left,
            ];
            for choice in choices {
                decide_and_settle(&mut deck, choice);
            }
            assert_eq!(liked_ids(&deck), vec!["b", "c"]);
        }

        #[test]
        fn test_decide_on_empty_deck_is_noop() {
            let mut deck = Deck::new(vec![]);
            let generation = deck.generation();

            assert!(deck.decide(Direction::Right).is_none());
            assert!(deck.decide(Direction::Left).is_none());

            assert_eq!(deck.cursor(), 0);
            assert!(deck.liked_items().is_empty());
            assert!(!deck.is_exhausted());
            assert_eq!(deck.generation(), generation);
        }

        #[test]
        fn test_decide_after_exhaustion_is_noop() {
            let mut deck = Deck::new(items(&["a"]));
            decide_and_settle(&mut deck, Direction::Right);
            assert!(deck.decide(Direction::Right).is_none());
            assert_eq!(liked_ids(&deck), vec!["a"]);
        }

        #[test]
        fn test_decision_recorded_before_cursor_moves() {
            let mut deck = Deck::new(items(&["a", "b"]));
            let advance = deck.decide(Direction::Right).unwrap();

            // Liked log updated immediately, visible card unchanged
            assert_eq!(liked_ids(&deck), vec!["a"]);
            assert_eq!(deck.current_item().unwrap().id, "a");
            assert_eq!(deck.statistics().decided, 1);

            assert!(deck.apply_advance(advance));
            assert_eq!(deck.current_item().unwrap().id, "b");
        }

        #[test]
        fn test_exhaustion_recorded_before_cursor_moves() {
            let mut deck = Deck::new(items(&["a"]));
            let advance = deck.decide(Direction::Left).unwrap();
            assert!(deck.is_exhausted());
            assert_eq!(deck.cursor(), 0);

            deck.apply_advance(advance);
            assert_eq!(deck.cursor(), 1);
        }

        #[test]
        fn test_second_decision_in_flight_is_rejected() {
            let mut deck = Deck::new(items(&["a", "b", "c"]));
            let first = deck.decide(Direction::Right).unwrap();

            assert!(deck.decide(Direction::Right).is_none());
            assert_eq!(liked_ids(&deck), vec!["a"]);

            deck.apply_advance(first);
            assert!(deck.decide(Direction::Right).is_some());
        }
    }

    mod advance_tests {
        use super::*;

        #[test]
        fn test_stale_generation_does_not_move_new_cursor() {
            let mut deck = Deck::new(items(&["a", "b"]));
            let stale = deck.decide(Direction::Right).unwrap();

            deck.reset(items(&["x", "y", "z"]));
            assert!(!deck.apply_advance(stale));

            assert_eq!(deck.cursor(), 0);
            assert_eq!(deck.current_item().unwrap().id, "x");
        }

        #[test]
        fn test_advance_applies_once() {
            let mut deck = Deck::new(items(&["a", "b", "c"]));
            let advance = deck.decide(Direction::Left).unwrap();

            assert!(deck.apply_advance(advance));
            assert!(!deck.apply_advance(advance));
            assert_eq!(deck.cursor(), 1);
        }

        #[test]
        fn test_advance_without_decision_is_ignored() {
            let mut deck = Deck::new(items(&["a", "b"]));
            let forged = ScheduledAdvance {
                generation: deck.generation(),
                to_cursor: 1,
            };
            assert!(!deck.apply_advance(forged));
            assert_eq!(deck.cursor(), 0);
        }
    }

    #[test]
    fn test_statistics() {
        let mut deck = Deck::new(items(&["a", "b", "c", "d"]));
        decide_and_settle(&mut deck, Direction::Right);
        decide_and_settle(&mut deck, Direction::Left);

        let stats = deck.statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.decided, 2);
        assert_eq!(stats.liked, 1);
    }
}
