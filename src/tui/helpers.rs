// Layout and formatting helpers shared by rendering and mouse hit-testing

use ratatui::layout::{Constraint, Direction, Layout, Rect};

const HEADER_HEIGHT: u16 = 4;
const FOOTER_HEIGHT: u16 = 3;
const CARD_MAX_WIDTH: u16 = 56;
const CARD_MAX_HEIGHT: u16 = 22;
pub const BUTTON_WIDTH: u16 = 10;
const BUTTON_GAP: u16 = 4;
const ACTION_BUTTON_WIDTH: u16 = 22;

/// Every region the event loop needs to know about, computed once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub content: Rect,
    /// Resting rect of the active card
    pub card: Rect,
    pub footer: Rect,
    pub nope_button: Rect,
    pub like_button: Rect,
    /// "Try Again" / "Swipe More Cats!"
    pub action_button: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    let (header, content, footer) = (chunks[0], chunks[1], chunks[2]);

    let card_width = content.width.saturating_sub(4).min(CARD_MAX_WIDTH);
    let card_height = content.height.saturating_sub(2).min(CARD_MAX_HEIGHT);
    let card = Rect::new(
        content.x + (content.width - card_width) / 2,
        content.y + (content.height - card_height) / 2,
        card_width,
        card_height,
    );

    let button_row = footer.y + footer.height.min(2) / 2;
    let pair_width = BUTTON_WIDTH * 2 + BUTTON_GAP;
    let start = footer.x + footer.width.saturating_sub(pair_width) / 2;
    let nope_button = Rect::new(start, button_row, BUTTON_WIDTH, 1).intersection(footer);
    let like_button =
        Rect::new(start + BUTTON_WIDTH + BUTTON_GAP, button_row, BUTTON_WIDTH, 1).intersection(footer);

    let action_width = ACTION_BUTTON_WIDTH.min(content.width);
    let action_button = Rect::new(
        content.x + (content.width - action_width) / 2,
        content.y + content.height.saturating_sub(3),
        action_width,
        content.height.min(1),
    );

    ScreenLayout {
        header,
        content,
        card,
        footer,
        nope_button,
        like_button,
        action_button,
    }
}

/// Whether a terminal cell lies inside `rect`
pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fraction of the deck decided, 0.0 for an empty deck
pub fn calculate_progress(decided: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (decided as f64 / total as f64).min(1.0)
}

pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "no tags".to_string();
    }
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}
