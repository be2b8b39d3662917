//! Draws one swipe card from its [`CardVisual`] snapshot.
//!
//! The picture is sampled into half blocks at the scaled size, shifted
//! horizontally by the drag offset, and sheared row by row to fake the
//! rotation. Anything that leaves the clip rect is dropped.

use super::colors::{rgb, ACCENT_PRIMARY, ACCENT_SECONDARY, BG_DARK_RGB, CARD_PLACEHOLDER_RGB, TEXT_PRIMARY};
use crate::domain::{CardVisual, SwipeHint};
use crate::preview::{fade, CardPicture};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

const HALF_BLOCK: &str = "▀";
/// Terminal cells are roughly twice as tall as wide
const CELL_ASPECT: f64 = 2.0;

pub struct CardWidget<'a> {
    visual: CardVisual,
    picture: Option<&'a CardPicture>,
    status: &'a str,
    sensitivity: f64,
    clip: Option<Rect>,
}

impl<'a> CardWidget<'a> {
    pub fn new(visual: CardVisual, sensitivity: f64) -> Self {
        Self {
            visual,
            picture: None,
            status: "",
            sensitivity,
            clip: None,
        }
    }

    pub fn picture(mut self, picture: Option<&'a CardPicture>) -> Self {
        self.picture = picture;
        self
    }

    /// Text shown in place of a missing picture
    pub fn status(mut self, status: &'a str) -> Self {
        self.status = status;
        self
    }

    /// Region the card may draw into while it slides off its resting rect
    pub fn clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }
}

/// Horizontal shift of `row` (0 = top) that fakes a rotation about the centre
pub fn row_shift(row: u16, height: u16, rotation_deg: f64) -> f64 {
    let dy = row as f64 + 0.5 - height as f64 / 2.0;
    -dy * rotation_deg.to_radians().tan() * CELL_ASPECT
}

struct ClipRegion {
    clip: Rect,
}

impl ClipRegion {
    fn cell<'b>(&self, buf: &'b mut Buffer, x: f64, y: u16) -> Option<&'b mut ratatui::buffer::Cell> {
        let x = x.round();
        if x < self.clip.x as f64 || x >= self.clip.right() as f64 {
            return None;
        }
        if y < self.clip.y || y >= self.clip.bottom() {
            return None;
        }
        buf.cell_mut((x as u16, y))
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let clip = self.clip.unwrap_or(area).intersection(buf.area);
        if clip.is_empty() || area.is_empty() {
            return;
        }
        let region = ClipRegion { clip };

        let scale = self.visual.scale.clamp(0.0, 1.0);
        let width = (area.width as f64 * scale).round() as u16;
        let height = (area.height as f64 * scale).round() as u16;
        if width == 0 || height == 0 {
            return;
        }

        let sensitivity = if self.sensitivity > 0.0 { self.sensitivity } else { 1.0 };
        let left = area.x as f64 + (area.width - width) as f64 / 2.0 + self.visual.offset / sensitivity;
        let top = area.y + (area.height - height) / 2;
        let opacity = self.visual.opacity;

        let cells = self.picture.map(|p| p.halfblocks(width, height));

        for row in 0..height {
            let y = top + row;
            let row_left = left + row_shift(row, height, self.visual.rotation);
            for col in 0..width {
                let Some(cell) = region.cell(buf, row_left + col as f64, y) else {
                    continue;
                };
                match cells.as_ref().and_then(|c| c.get(row as usize)?.get(col as usize)) {
                    Some(block) => {
                        cell.set_symbol(HALF_BLOCK)
                            .set_fg(rgb(fade(block.top, BG_DARK_RGB, opacity)))
                            .set_bg(rgb(fade(block.bottom, BG_DARK_RGB, opacity)));
                    }
                    None => {
                        cell.set_symbol(" ")
                            .set_bg(rgb(fade(CARD_PLACEHOLDER_RGB, BG_DARK_RGB, opacity)));
                    }
                }
            }
        }

        if self.picture.is_none() && !self.status.is_empty() {
            let row = height / 2;
            let text_width = self.status.chars().count() as f64;
            let x = left + row_shift(row, height, self.visual.rotation) + (width as f64 - text_width) / 2.0;
            let style = Style::default()
                .fg(TEXT_PRIMARY)
                .bg(rgb(fade(CARD_PLACEHOLDER_RGB, BG_DARK_RGB, opacity)));
            draw_text(buf, &region, x.max(left), top + row, self.status, style);
        }

        let stamp = match self.visual.hint {
            SwipeHint::None => None,
            SwipeHint::Right => Some((" LIKE ", ACCENT_SECONDARY, 2.0)),
            SwipeHint::Left => Some((" NOPE ", ACCENT_PRIMARY, width as f64 - 8.0)),
        };
        if let Some((text, color, column)) = stamp {
            let row = 1u16.min(height - 1);
            let x = left + row_shift(row, height, self.visual.rotation) + column.max(0.0);
            let style = Style::default()
                .fg(Color::White)
                .bg(color)
                .add_modifier(Modifier::BOLD);
            draw_text(buf, &region, x, top + row, text, style);
        }
    }
}

fn draw_text(buf: &mut Buffer, region: &ClipRegion, x: f64, y: u16, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(cell) = region.cell(buf, x + i as f64, y) {
            cell.set_char(ch).set_style(style);
        }
    }
}
