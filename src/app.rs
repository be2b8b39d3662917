//! Application controller: the surface the event loop and renderer bind to.
//!
//! Owns the deck, the deferred-advance queue, and the gesture state of the
//! two rendered cards. Time is passed in explicitly so everything here runs
//! the same under test as in the terminal.

use crate::async_loader::FetchOutcome;
use crate::domain::{
    AdvanceScheduler, Deck, DeckStatistics, Direction, GestureOutcome, Item, SwipeCard,
    EXIT_ANIMATION,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Failed(String),
}

/// What the renderer should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Error(String),
    /// Fetched fine but nothing to show
    Empty,
    Browsing,
    Summary,
}

#[derive(Debug, Clone)]
struct DragSession {
    item_id: String,
    start_column: u16,
    offset: f64,
}

#[derive(Debug)]
pub struct App {
    deck: Deck,
    scheduler: AdvanceScheduler,
    fetch: FetchState,
    active_card: Option<SwipeCard>,
    next_card: Option<SwipeCard>,
    drag: Option<DragSession>,
    sensitivity: f64,
    last_tick: Option<Instant>,
}

impl App {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            deck: Deck::default(),
            scheduler: AdvanceScheduler::new(),
            fetch: FetchState::Idle,
            active_card: None,
            next_card: None,
            drag: None,
            sensitivity,
            last_tick: None,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Gesture units per dragged column
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn active_card(&self) -> Option<&SwipeCard> {
        self.active_card.as_ref()
    }

    pub fn next_card(&self) -> Option<&SwipeCard> {
        self.next_card.as_ref()
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.deck.current_item()
    }

    pub fn peek_next_item(&self) -> Option<&Item> {
        self.deck.peek_next_item()
    }

    pub fn liked_items(&self) -> &[Item] {
        self.deck.liked_items()
    }

    pub fn is_exhausted(&self) -> bool {
        self.deck.is_exhausted()
    }

    pub fn statistics(&self) -> DeckStatistics {
        self.deck.statistics()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    pub fn screen(&self) -> Screen {
        if self.is_fetching() {
            return Screen::Loading;
        }
        if self.deck.is_exhausted() && !self.deck.has_pending_advance() {
            return Screen::Summary;
        }
        if self.deck.current_item().is_none() {
            return match &self.fetch {
                FetchState::Failed(message) => Screen::Error(message.clone()),
                _ => Screen::Empty,
            };
        }
        Screen::Browsing
    }

    /// Whether like/nope controls should accept input right now
    pub fn decisions_enabled(&self) -> bool {
        !self.is_fetching()
            && self.deck.current_item().is_some()
            && !self.deck.has_pending_advance()
    }

    /// True while the event loop should tick at animation rate
    pub fn is_animating(&self) -> bool {
        !self.scheduler.is_empty()
            || self.drag.is_some()
            || self.active_card.as_ref().is_some_and(SwipeCard::is_animating)
            || self.next_card.as_ref().is_some_and(SwipeCard::is_animating)
    }

    /// Time until the next deferred advance fires
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.scheduler.next_due_in(now)
    }

    /// Clears the deck and marks a fetch as in flight.
    ///
    /// Returns false, changing nothing, while a fetch is already running;
    /// the caller starts the actual fetch only on true.
    pub fn reset(&mut self) -> bool {
        if self.is_fetching() {
            debug!("Reset ignored while a fetch is in flight");
            return false;
        }

        let generation = self.deck.load(Vec::new());
        self.scheduler.discard_before(generation);
        self.fetch = FetchState::Loading;
        self.drag = None;
        self.sync_cards();
        info!(generation, "Deck reset requested");
        true
    }

    /// Installs the result of the outstanding fetch
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { items, error } = outcome;
        let generation = self.deck.reset(items);
        self.scheduler.discard_before(generation);

        self.fetch = match error {
            Some(message) => {
                warn!(%message, "Cat fetch failed");
                FetchState::Failed(message)
            }
            None => FetchState::Idle,
        };
        if self.fetch == FetchState::Idle && self.deck.is_empty() {
            warn!("Cat fetch returned no cats");
        }

        self.drag = None;
        self.sync_cards();
    }

    /// Records a decision from a button or key and flings the card out
    pub fn decide(&mut self, direction: Direction, now: Instant) -> bool {
        if self.is_fetching() {
            return false;
        }
        if !self.commit(direction, now) {
            return false;
        }

        if let Some(card) = self.active_card.as_mut() {
            card.fling(direction);
        }
        self.drag = None;
        true
    }

    /// Starts a drag when the press lands on the active card
    pub fn pointer_down(&mut self, column: u16, on_active_card: bool) -> bool {
        if !on_active_card || !self.decisions_enabled() {
            return false;
        }
        let Some(card) = self.active_card.as_ref() else {
            return false;
        };
        if card.is_exiting() {
            return false;
        }

        self.drag = Some(DragSession {
            item_id: card.item_id().to_string(),
            start_column: column,
            offset: 0.0,
        });
        true
    }

    /// Feeds a drag sample; ignored without a drag in progress
    pub fn pointer_drag(&mut self, column: u16) {
        let Some(offset) = self.drag_offset(column) else {
            return;
        };
        if let Some(drag) = self.drag.as_mut() {
            drag.offset = offset;
        }
        if let Some(card) = self.active_card.as_mut() {
            card.drag_to(offset);
        }
    }

    /// Ends the drag, committing a decision when past the threshold
    pub fn pointer_up(&mut self, column: u16, now: Instant) -> GestureOutcome {
        let Some(offset) = self.drag_offset(column) else {
            return GestureOutcome::Ignored;
        };
        self.drag = None;

        let outcome = match self.active_card.as_mut() {
            Some(card) => card.end_drag(offset),
            None => GestureOutcome::Ignored,
        };

        if let GestureOutcome::Committed(direction) = outcome {
            self.commit(direction, now);
        }
        debug!(?outcome, offset, "Drag ended");
        outcome
    }

    /// Advances animations and applies due cursor moves
    pub fn tick(&mut self, now: Instant) {
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        for card in [self.active_card.as_mut(), self.next_card.as_mut()]
            .into_iter()
            .flatten()
        {
            card.step(dt);
        }

        let mut moved = false;
        for advance in self.scheduler.drain_due(now) {
            moved |= self.deck.apply_advance(advance);
        }
        if moved {
            self.sync_cards();
        }
    }

    fn commit(&mut self, direction: Direction, now: Instant) -> bool {
        match self.deck.decide(direction) {
            Some(advance) => {
                self.scheduler.schedule(advance, now, EXIT_ANIMATION);
                true
            }
            None => false,
        }
    }

    fn drag_offset(&self, column: u16) -> Option<f64> {
        let drag = self.drag.as_ref()?;
        let active_id = self.active_card.as_ref()?.item_id();
        if drag.item_id != active_id {
            return None;
        }
        let columns = column as f64 - drag.start_column as f64;
        Some(columns * self.sensitivity)
    }

    /// Keys the two card states to the deck's current and next items
    fn sync_cards(&mut self) {
        let current_id = self.deck.current_item().map(|item| item.id.clone());
        let next_id = self.deck.peek_next_item().map(|item| item.id.clone());

        // A card that has been flung never comes back, even if the next item
        // carries the same id
        let active_matches = self
            .active_card
            .as_ref()
            .filter(|c| !c.is_exiting())
            .map(|c| c.item_id().to_string())
            == current_id;
        if !active_matches {
            let promoted = match (&current_id, self.next_card.take()) {
                (Some(id), Some(mut card)) if card.item_id() == id.as_str() => {
                    card.set_active(true);
                    Some(card)
                }
                (Some(id), _) => Some(SwipeCard::new(id.clone(), true)),
                (None, _) => None,
            };
            self.active_card = promoted;
        }

        let next_matches = self.next_card.as_ref().map(|c| c.item_id().to_string()) == next_id;
        if !next_matches {
            self.next_card = next_id.map(|id| SwipeCard::new(id, false));
        }

        let drag_stale = match (&self.drag, &self.active_card) {
            (Some(drag), Some(card)) => drag.item_id != card.item_id(),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if drag_stale {
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture::INACTIVE_SCALE;
    use crate::domain::{CardPhase, SwipeHint};

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter()
            .map(|id| Item::new(*id, format!("https://cataas.com/cat/{}", id)))
            .collect()
    }

    fn loaded(ids: &[&str]) -> App {
        let mut app = App::new(1.0);
        assert!(app.reset());
        app.finish_fetch(FetchOutcome {
            items: items(ids),
            error: None,
        });
        app
    }

    fn current_id(app: &App) -> Option<&str> {
        app.current_item().map(|i| i.id.as_str())
    }

    fn after(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    mod fetch_tests {
        use super::*;

        #[test]
        fn test_reset_shows_loading_and_blocks_second_reset() {
            let mut app = App::new(1.0);
            assert!(app.reset());
            assert_eq!(app.screen(), Screen::Loading);
            assert!(!app.reset());
            assert!(!app.decisions_enabled());
        }

        #[test]
        fn test_finish_fetch_starts_browsing() {
            let app = loaded(&["a", "b"]);
            assert_eq!(app.screen(), Screen::Browsing);
            assert_eq!(current_id(&app), Some("a"));
            assert_eq!(app.active_card().unwrap().item_id(), "a");
            assert_eq!(app.next_card().unwrap().item_id(), "b");
            assert!(!app.next_card().unwrap().is_active());
        }

        #[test]
        fn test_empty_fetch_is_empty_screen_not_error() {
            let app = loaded(&[]);
            assert_eq!(app.screen(), Screen::Empty);
            assert!(!app.is_exhausted());
            assert!(app.active_card().is_none());
        }

        #[test]
        fn test_failed_fetch_shows_error() {
            let mut app = App::new(1.0);
            app.reset();
            app.finish_fetch(FetchOutcome {
                items: vec![],
                error: Some("Received an unexpected response from the cat API.".to_string()),
            });

            assert_eq!(
                app.screen(),
                Screen::Error("Received an unexpected response from the cat API.".to_string())
            );
            // Retry is allowed
            assert!(app.reset());
        }

        #[test]
        fn test_decide_ignored_while_loading() {
            let mut app = loaded(&["a"]);
            app.reset();
            assert!(!app.decide(Direction::Right, Instant::now()));
        }
    }

    mod decision_tests {
        use super::*;

        #[test]
        fn test_button_decision_defers_visible_advance() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);
            app.tick(start);

            assert!(app.decide(Direction::Right, start));
            assert_eq!(app.liked_items().len(), 1);
            assert!(app.active_card().unwrap().is_exiting());
            assert_eq!(current_id(&app), Some("a"));
            assert!(!app.decisions_enabled());

            app.tick(after(start, 299));
            assert_eq!(current_id(&app), Some("a"));

            app.tick(after(start, 300));
            assert_eq!(current_id(&app), Some("b"));
            assert!(app.decisions_enabled());
        }

        #[test]
        fn test_second_button_press_in_flight_ignored() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b", "c"]);

            assert!(app.decide(Direction::Right, start));
            assert!(!app.decide(Direction::Right, start));
            assert_eq!(app.liked_items().len(), 1);
        }

        #[test]
        fn test_scenario_full_traversal_reaches_summary() {
            let start = Instant::now();
            let mut app = loaded(&["A", "B", "C"]);
            let mut now = start;
            app.tick(now);

            for (i, direction) in [Direction::Right, Direction::Left, Direction::Right]
                .into_iter()
                .enumerate()
            {
                assert!(app.decide(direction, now));
                assert_eq!(app.is_exhausted(), i == 2);
                now += EXIT_ANIMATION;
                app.tick(now);
            }

            let liked: Vec<_> = app.liked_items().iter().map(|i| i.id.as_str()).collect();
            assert_eq!(liked, vec!["A", "C"]);
            assert_eq!(app.screen(), Screen::Summary);
            assert!(app.active_card().is_none());
        }

        #[test]
        fn test_summary_waits_for_last_exit() {
            let start = Instant::now();
            let mut app = loaded(&["only"]);
            app.decide(Direction::Left, start);

            assert!(app.is_exhausted());
            assert_eq!(app.screen(), Screen::Browsing);

            app.tick(after(start, 300));
            assert_eq!(app.screen(), Screen::Summary);
        }

        #[test]
        fn test_reset_supersedes_pending_advance() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);
            app.decide(Direction::Right, start);

            app.reset();
            app.finish_fetch(FetchOutcome {
                items: items(&["x", "y", "z"]),
                error: None,
            });

            app.tick(after(start, 1000));
            assert_eq!(current_id(&app), Some("x"));
            assert_eq!(app.deck().cursor(), 0);
            assert!(app.liked_items().is_empty());
            assert!(!app.is_exhausted());
        }

        #[test]
        fn test_reset_from_summary_reinitialises() {
            let start = Instant::now();
            let mut app = loaded(&["a"]);
            app.decide(Direction::Right, start);
            app.tick(after(start, 300));
            assert_eq!(app.screen(), Screen::Summary);

            app.reset();
            app.finish_fetch(FetchOutcome {
                items: items(&["b"]),
                error: None,
            });

            assert_eq!(app.screen(), Screen::Browsing);
            assert!(app.liked_items().is_empty());
            assert_eq!(app.deck().cursor(), 0);
        }
    }

    mod gesture_tests {
        use super::*;

        #[test]
        fn test_drag_past_threshold_commits() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);

            assert!(app.pointer_down(10, true));
            app.pointer_drag(60);
            assert_eq!(app.active_card().unwrap().hint(), SwipeHint::Right);

            let outcome = app.pointer_up(111, start);
            assert_eq!(outcome, GestureOutcome::Committed(Direction::Right));
            assert_eq!(app.liked_items().len(), 1);

            app.tick(start);
            app.tick(after(start, 300));
            assert_eq!(current_id(&app), Some("b"));
        }

        #[test]
        fn test_drag_exactly_threshold_cancels() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);

            app.pointer_down(200, true);
            let outcome = app.pointer_up(100, start);

            assert_eq!(outcome, GestureOutcome::Cancelled);
            assert!(app.liked_items().is_empty());
            assert_eq!(current_id(&app), Some("a"));
            assert!(matches!(
                app.active_card().unwrap().phase(),
                CardPhase::Returning { .. }
            ));
        }

        #[test]
        fn test_drag_left_commits_reject() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);

            app.pointer_down(200, true);
            let outcome = app.pointer_up(99, start);

            assert_eq!(outcome, GestureOutcome::Committed(Direction::Left));
            assert!(app.liked_items().is_empty());
            assert_eq!(app.statistics().decided, 1);
        }

        #[test]
        fn test_cancelled_drag_returns_to_rest() {
            let start = Instant::now();
            let mut app = loaded(&["a"]);
            app.tick(start);

            app.pointer_down(0, true);
            app.pointer_drag(50);
            app.pointer_up(50, start);

            let mut now = start;
            for _ in 0..200 {
                now += Duration::from_millis(16);
                app.tick(now);
            }
            let card = app.active_card().unwrap();
            assert_eq!(card.phase(), CardPhase::Resting);
            assert_eq!(card.offset(), 0.0);
        }

        #[test]
        fn test_press_off_card_does_not_drag() {
            let mut app = loaded(&["a"]);
            assert!(!app.pointer_down(10, false));
            app.pointer_drag(200);
            assert_eq!(app.active_card().unwrap().offset(), 0.0);
            assert_eq!(app.pointer_up(200, Instant::now()), GestureOutcome::Ignored);
        }

        #[test]
        fn test_no_drag_on_empty_deck() {
            let mut app = loaded(&[]);
            assert!(!app.pointer_down(0, true));
        }

        #[test]
        fn test_no_drag_while_decision_in_flight() {
            let mut app = loaded(&["a", "b"]);
            app.decide(Direction::Left, Instant::now());
            assert!(!app.pointer_down(0, true));
        }

        #[test]
        fn test_sensitivity_scales_columns() {
            let mut app = App::new(8.0);
            app.reset();
            app.finish_fetch(FetchOutcome {
                items: items(&["a"]),
                error: None,
            });

            app.pointer_down(20, true);
            app.pointer_drag(25);
            assert_eq!(app.active_card().unwrap().offset(), 40.0);

            // 13 columns * 8 = 104 > 100
            let outcome = app.pointer_up(33, Instant::now());
            assert_eq!(outcome, GestureOutcome::Committed(Direction::Right));
        }
    }

    mod card_tests {
        use super::*;

        #[test]
        fn test_next_card_is_promoted_on_advance() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b", "c"]);
            app.tick(start);
            assert_eq!(app.next_card().unwrap().visual().scale, INACTIVE_SCALE);

            app.decide(Direction::Left, start);
            app.tick(after(start, 300));

            let active = app.active_card().unwrap();
            assert_eq!(active.item_id(), "b");
            assert!(active.is_active());
            assert_eq!(active.offset(), 0.0);
            assert_eq!(app.next_card().unwrap().item_id(), "c");

            app.tick(after(start, 600));
            assert_eq!(app.active_card().unwrap().visual().scale, 1.0);
            assert_eq!(app.active_card().unwrap().visual().opacity, 1.0);
        }

        #[test]
        fn test_repeated_id_gets_a_fresh_card() {
            let start = Instant::now();
            let mut app = loaded(&["a", "a", "b"]);
            app.tick(start);

            assert!(app.decide(Direction::Right, start));
            app.tick(after(start, 400));

            assert_eq!(app.deck().cursor(), 1);
            let active = app.active_card().unwrap();
            assert_eq!(active.item_id(), "a");
            assert!(!active.is_exiting());
            assert_eq!(active.offset(), 0.0);
            assert!(active.visual().opacity > 0.0);
            assert_eq!(app.next_card().unwrap().item_id(), "b");

            assert!(app.pointer_down(10, true));
        }

        #[test]
        fn test_button_decision_on_repeated_id_flings_card() {
            let start = Instant::now();
            let mut app = loaded(&["a", "a", "b"]);
            app.tick(start);
            app.decide(Direction::Right, start);
            app.tick(after(start, 400));

            assert!(app.decide(Direction::Left, after(start, 400)));
            assert!(app.active_card().unwrap().is_exiting());
        }

        #[test]
        fn test_last_card_has_no_next() {
            let app = loaded(&["solo"]);
            assert!(app.next_card().is_none());
            assert!(app.peek_next_item().is_none());
        }

        #[test]
        fn test_is_animating_while_advance_pending() {
            let start = Instant::now();
            let mut app = loaded(&["a", "b"]);
            app.tick(start);
            assert!(!app.is_animating());

            app.decide(Direction::Right, start);
            assert!(app.is_animating());
            assert_eq!(
                app.next_deadline(start),
                Some(EXIT_ANIMATION)
            );
        }
    }
}
