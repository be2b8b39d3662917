//! Catswp - swipe through cat pictures in the terminal
//!
//! The deck and gesture logic live in [`domain`] and are independent of the
//! terminal; [`app::App`] ties them to fetched batches and pointer input.

pub mod app;
pub mod async_loader;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod preview;
pub mod source;
pub mod tui;

// Re-export primary types for convenience
pub use app::{App, Screen};
pub use config::UserConfig;
pub use domain::{
    AdvanceScheduler, Deck, DeckPhase, DeckStatistics, Direction, GestureOutcome, Item,
    ItemMetadata, ScheduledAdvance, SwipeCard, SwipeHint,
};
pub use error::{CatSwipeError, Result};
pub use source::{CataasSource, ImageSource, SourceError};
