// TUI module for rendering the terminal interface
pub mod card;
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, contains, format_tags, screen_layout, ScreenLayout};
pub use input::{handle_key_event, handle_mouse_event, handle_overlay_input, KeyAction, PointerAction};

use crate::app::{App, Screen};
use crate::async_loader::{CardImageManager, CardImageState};
use crate::domain::{Item, SwipeCard};
use card::CardWidget;
use helpers::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Whatever the app screen is, no overlay
    Main,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
}

/// Where the renderer gets card pictures from
pub trait CardPictures {
    fn picture(&mut self, item: &Item) -> CardImageState;
}

impl CardPictures for CardImageManager {
    fn picture(&mut self, item: &Item) -> CardImageState {
        self.request(item)
    }
}

/// Label of the clickable button in the content area, if the screen has one
pub fn action_label(screen: &Screen) -> Option<&'static str> {
    match screen {
        Screen::Error(_) | Screen::Empty => Some("[ Try Again ]"),
        Screen::Summary => Some("[ Swipe More Cats! ]"),
        Screen::Loading | Screen::Browsing => None,
    }
}

/// Renders the whole frame
pub fn render(frame: &mut Frame, app: &App, view: &ViewState, pictures: &mut dyn CardPictures) {
    let layout = screen_layout(frame.area());
    frame.render_widget(
        Block::default().style(Style::default().bg(BG_DARK)),
        frame.area(),
    );

    render_header(frame, layout.header, app);

    let screen = app.screen();
    match &screen {
        Screen::Loading => render_loading(frame, layout.content),
        Screen::Error(message) => render_error(frame, layout.content, message),
        Screen::Empty => render_empty_state(frame, layout.content),
        Screen::Browsing => render_cards(frame, &layout, app, pictures),
        Screen::Summary => render_summary(frame, layout.content, app),
    }
    if let Some(label) = action_label(&screen) {
        render_action_button(frame, layout.action_button, label);
    }

    render_footer(frame, &layout, app);

    match view {
        ViewState::Main => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::Welcome => render_welcome_overlay(frame),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let stats = app.statistics();
    let mut title = vec![Span::styled(
        " Cat Swiper ",
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )];
    match app.current_item() {
        Some(item) => {
            let position = (app.deck().cursor() + 1).min(stats.total);
            title.push(Span::styled(
                format!(" Cat {}/{} ", position, stats.total),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ));
            title.push(Span::styled(
                format!(" {}", item.id),
                Style::default().fg(TEXT_SECONDARY),
            ));
        }
        None => title.push(Span::styled(
            " No cat on deck",
            Style::default().fg(TEXT_SECONDARY),
        )),
    }

    let header = Paragraph::new(Line::from(title)).block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(header, chunks[0]);

    let progress = calculate_progress(stats.decided, stats.total);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!(
            "{}/{} swiped · ♥ {}",
            stats.decided, stats.total, stats.liked
        ));
    frame.render_widget(gauge, chunks[1]);
}

fn render_cards(
    frame: &mut Frame,
    layout: &ScreenLayout,
    app: &App,
    pictures: &mut dyn CardPictures,
) {
    // Next card first so the active one paints over it
    if let (Some(card), Some(item)) = (app.next_card(), app.peek_next_item()) {
        render_card(frame, layout, card, item, app.sensitivity(), pictures);
    }
    if let (Some(card), Some(item)) = (app.active_card(), app.current_item()) {
        render_card(frame, layout, card, item, app.sensitivity(), pictures);

        let caption_row = layout.card.bottom();
        if caption_row < layout.content.bottom() && !card.is_exiting() {
            let caption = Paragraph::new(Span::styled(
                format_tags(&item.metadata.tags),
                Style::default().fg(TEXT_SECONDARY),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(
                caption,
                Rect::new(layout.content.x, caption_row, layout.content.width, 1),
            );
        }
    }
}

fn render_card(
    frame: &mut Frame,
    layout: &ScreenLayout,
    card: &SwipeCard,
    item: &Item,
    sensitivity: f64,
    pictures: &mut dyn CardPictures,
) {
    let state = pictures.picture(item);
    let (picture, status) = match &state {
        CardImageState::Ready(picture) => (Some(picture.as_ref()), ""),
        CardImageState::Loading => (None, "Loading cat..."),
        CardImageState::Error(_) => (None, "Could not load this cat"),
    };

    let widget = CardWidget::new(card.visual(), sensitivity)
        .picture(picture)
        .status(status)
        .clip(layout.content);
    frame.render_widget(widget, layout.card);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let spinners = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let spinner = spinners[(now / 100) as usize % spinners.len()];

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(
                "Fetching cute cats...",
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Oops!",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(TEXT_PRIMARY))),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to try again",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_PRIMARY)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Fetch succeeded but returned nothing
fn render_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No Cats Found",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "No more cats to show right now. Try again later?",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Renders the end-of-deck summary with the liked cats
pub fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" All Done ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = app.statistics();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("You liked {} out of {} cats!", stats.liked, stats.total),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let liked = app.liked_items();
    if liked.is_empty() {
        lines.push(Line::from(Span::styled(
            "No favourites this round.",
            Style::default().fg(TEXT_SECONDARY),
        )));
    }

    // Leave room for the action button and key hint below the list
    let room = (inner.height as usize).saturating_sub(lines.len() + 4);
    for item in liked.iter().take(room) {
        lines.push(Line::from(vec![
            Span::styled("♥ ", Style::default().fg(ACCENT_SECONDARY)),
            Span::styled(item.id.clone(), Style::default().fg(TEXT_PRIMARY)),
            Span::raw("  "),
            Span::styled(
                format_tags(&item.metadata.tags),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]));
    }
    if liked.len() > room {
        lines.push(Line::from(Span::styled(
            format!("…and {} more", liked.len() - room),
            Style::default().fg(TEXT_SECONDARY),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

fn render_action_button(frame: &mut Frame, area: Rect, label: &str) {
    let button = Paragraph::new(Span::styled(
        label.to_string(),
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(button, area);
}

fn render_footer(frame: &mut Frame, layout: &ScreenLayout, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));
    let inner = block.inner(layout.footer);
    frame.render_widget(block, layout.footer);

    if inner.width >= 60 {
        let hints = Paragraph::new(Line::from(vec![
            Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  "),
            Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Quit ", Style::default().fg(TEXT_SECONDARY)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(hints, inner);
    }

    let enabled = app.decisions_enabled();
    let button = |label: &'static str, color: Color| {
        let style = if enabled {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DISABLED)
        };
        Paragraph::new(Span::styled(label, style))
    };
    frame.render_widget(button("[ ✗ Nope ]", ACCENT_PRIMARY), layout.nope_button);
    frame.render_widget(button("[ ♥ Like ]", ACCENT_SECONDARY), layout.like_button);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let help_area = centered_rect(50, 70, area);

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  → ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("or "),
            Span::styled("l", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     Like"),
        ]),
        Line::from(vec![
            Span::styled("  ← ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("or "),
            Span::styled("h", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("     Nope"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  drag", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw("  Swipe the card with the mouse"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  r ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("          New deck"),
        ]),
        Line::from(vec![
            Span::styled("  o ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("          Open cat in browser"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("or "),
            Span::styled("Esc", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("     Quit"),
        ]),
        Line::from(vec![
            Span::styled("  ?", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("           Toggle help"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(85, 85, frame.area());

    // Clear background
    frame.render_widget(Clear, area);

    let welcome_lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "Welcome to Cat Swiper!",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::raw(
            "A fresh deck of cats is fetched for you. Decide on each one and see your favourites at the end.",
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Quick Start:",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  1. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Grab the card with the mouse and drag it"),
        ]),
        Line::from(vec![
            Span::styled("  2. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Drag "),
            Span::styled(
                "right",
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to "),
            Span::styled("like", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" or "),
            Span::styled(
                "left",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to "),
            Span::styled("pass", Style::default().fg(ACCENT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  3. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Let go early and the card springs back"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Essential Keyboard Shortcuts:",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  → / l  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("      Like"),
        ]),
        Line::from(vec![
            Span::styled("  ← / h  ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("      Nope"),
        ]),
        Line::from(vec![
            Span::styled("  r      ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("      Fetch a new deck"),
        ]),
        Line::from(vec![
            Span::styled("  ?      ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("      Show help (access this anytime)"),
        ]),
        Line::from(vec![
            Span::styled("  q / Esc", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("      Quit application"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Enter to start swiping...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(
            Block::default()
                .title(Span::styled(
                    " Welcome ",
                    Style::default()
                        .fg(ACCENT_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}
