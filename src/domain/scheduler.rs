use super::ScheduledAdvance;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Instant,
    advance: ScheduledAdvance,
}

/// Queue of deferred cursor advances, drained by the event loop.
///
/// Entries keep their generation tag; dropping stale ones is left to
/// [`super::Deck::apply_advance`], and [`AdvanceScheduler::discard_before`]
/// lets the owner clear them eagerly after a reset.
#[derive(Debug, Default)]
pub struct AdvanceScheduler {
    entries: Vec<Entry>,
}

impl AdvanceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, advance: ScheduledAdvance, now: Instant, delay: Duration) {
        self.entries.push(Entry {
            due: now + delay,
            advance,
        });
    }

    /// Removes and returns every advance due at `now`, oldest first
    pub fn drain_due(&mut self, now: Instant) -> Vec<ScheduledAdvance> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.due <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| entry.due);
        due.into_iter().map(|entry| entry.advance).collect()
    }

    /// Drops every advance issued for a generation older than `generation`
    pub fn discard_before(&mut self, generation: u64) {
        self.entries
            .retain(|entry| entry.advance.generation >= generation);
    }

    /// Time until the next entry fires, if any
    pub fn next_due_in(&self, now: Instant) -> Option<Duration> {
        self.entries
            .iter()
            .map(|entry| entry.due.saturating_duration_since(now))
            .min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(generation: u64, to_cursor: usize) -> ScheduledAdvance {
        ScheduledAdvance {
            generation,
            to_cursor,
        }
    }

    #[test]
    fn test_nothing_due_before_delay() {
        let mut scheduler = AdvanceScheduler::new();
        let start = Instant::now();
        scheduler.schedule(advance(1, 1), start, Duration::from_millis(300));

        assert!(scheduler
            .drain_due(start + Duration::from_millis(299))
            .is_empty());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_due_after_delay() {
        let mut scheduler = AdvanceScheduler::new();
        let start = Instant::now();
        scheduler.schedule(advance(1, 1), start, Duration::from_millis(300));

        let due = scheduler.drain_due(start + Duration::from_millis(300));
        assert_eq!(due, vec![advance(1, 1)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_drain_orders_by_due_time() {
        let mut scheduler = AdvanceScheduler::new();
        let start = Instant::now();
        scheduler.schedule(advance(2, 1), start + Duration::from_millis(50), Duration::ZERO);
        scheduler.schedule(advance(1, 3), start, Duration::ZERO);

        let due = scheduler.drain_due(start + Duration::from_secs(1));
        assert_eq!(due, vec![advance(1, 3), advance(2, 1)]);
    }

    #[test]
    fn test_discard_before_generation() {
        let mut scheduler = AdvanceScheduler::new();
        let start = Instant::now();
        scheduler.schedule(advance(1, 1), start, Duration::from_millis(300));
        scheduler.schedule(advance(2, 1), start, Duration::from_millis(300));

        scheduler.discard_before(2);

        let due = scheduler.drain_due(start + Duration::from_secs(1));
        assert_eq!(due, vec![advance(2, 1)]);
    }

    #[test]
    fn test_next_due_in() {
        let mut scheduler = AdvanceScheduler::new();
        let start = Instant::now();
        assert!(scheduler.next_due_in(start).is_none());

        scheduler.schedule(advance(1, 1), start, Duration::from_millis(300));
        assert_eq!(
            scheduler.next_due_in(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            scheduler.next_due_in(start + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
