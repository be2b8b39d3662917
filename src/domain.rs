pub mod deck;
pub mod gesture;
pub mod scheduler;

pub use deck::{Deck, ScheduledAdvance};
pub use gesture::{CardPhase, CardVisual, GestureOutcome, SwipeCard, SwipeHint};
pub use scheduler::AdvanceScheduler;

use chrono::{DateTime, Utc};
use std::time::Duration;

/// How long the outgoing card animates before the visible cursor moves on.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

/// Descriptive data carried with an item. The deck never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    pub mimetype: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for ItemMetadata {
    fn default() -> Self {
        Self {
            mimetype: "image/jpeg".to_string(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// One browsable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub image_url: String,
    pub metadata: ItemMetadata,
}

impl Item {
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_url: image_url.into(),
            metadata: ItemMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A committed swipe direction. `Right` accepts, `Left` rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1.0 for right, -1.0 for left
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Lifecycle of one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    /// Cursor is within the deck, or the deck is empty
    Browsing,
    /// Every card has received a decision
    Exhausted,
}

/// Counts shown in the header and on the summary screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckStatistics {
    pub total: usize,
    pub decided: usize,
    pub liked: usize,
}
