use iced::Color;

// Background colors
pub const BG_PAGE: Color = Color::from_rgb(0.96, 0.97, 0.98);
pub const BG_CARD: Color = Color::WHITE;
pub const BG_SIDEBAR: Color = Color::from_rgb(0.0, 0.16, 0.36);

// Stroke/border colors
pub const STROKE_DIM: Color = Color::from_rgb(0.88, 0.9, 0.93);

// Brand colors
pub const BRAND_BLUE: Color = Color::from_rgb(0.0, 0.24, 0.53);
pub const BRAND_RED: Color = Color::from_rgb(0.75, 0.1, 0.18);

// Status colors
pub const POSITIVE: Color = Color::from_rgb(0.09, 0.64, 0.29);
pub const NEGATIVE: Color = Color::from_rgb(0.86, 0.15, 0.15);
pub const STAR: Color = Color::from_rgb(0.98, 0.75, 0.14);

// Text colors
pub const TEXT_DARK: Color = Color::from_rgb(0.07, 0.09, 0.15);
pub const TEXT_MUTED: Color = Color::from_rgb(0.42, 0.45, 0.5);
pub const TEXT_ON_BRAND: Color = Color::WHITE;

// Overlay colors
pub const TOOLTIP_BG: Color = Color::from_rgba(0.07, 0.09, 0.15, 0.92);

/// Pie slices: today, this week, this month, this year.
pub const PIE_COLORS: [Color; 4] = [
    Color::from_rgb(0.0, 0.24, 0.53),
    Color::from_rgb(0.23, 0.51, 0.96),
    Color::from_rgb(0.75, 0.1, 0.18),
    Color::from_rgb(0.98, 0.62, 0.25),
];
