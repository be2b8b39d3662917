// Colour palette shared by every screen
use ratatui::style::Color;

/// Reject / error red
pub const ACCENT_PRIMARY: Color = Color::Rgb(239, 68, 68);
/// Like green
pub const ACCENT_SECONDARY: Color = Color::Rgb(34, 197, 94);
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(236, 72, 153);

pub const TEXT_PRIMARY: Color = Color::Rgb(243, 244, 246);
pub const TEXT_SECONDARY: Color = Color::Rgb(156, 163, 175);
pub const TEXT_DISABLED: Color = Color::Rgb(75, 85, 99);

pub const BG_DARK_RGB: [u8; 3] = [17, 24, 39];
pub const BG_DARK: Color = rgb(BG_DARK_RGB);
pub const BORDER_COLOR: Color = Color::Rgb(55, 65, 81);

/// Fill for a card whose picture has not arrived
pub const CARD_PLACEHOLDER_RGB: [u8; 3] = [55, 48, 72];

pub const fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb(c[0], c[1], c[2])
}
