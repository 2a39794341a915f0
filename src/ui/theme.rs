use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub overlay_border: Color,
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub table_header_fg: Color,
    pub statusbar_bg: Color,
    pub surface_bg: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            text_muted: Color::Rgb(108, 112, 134),
            overlay_border: Color::Rgb(88, 91, 112),
            header_accent_fg: Color::Rgb(30, 30, 46),
            header_accent_bg: Color::Rgb(137, 180, 250),
            gauge_filled: Color::Rgb(166, 227, 161),
            gauge_unfilled: Color::Rgb(49, 50, 68),
            table_header_fg: Color::Rgb(249, 226, 175),
            statusbar_bg: Color::Rgb(24, 24, 37),
            surface_bg: Color::Rgb(49, 50, 68),
            pill_key_fg: Color::Rgb(30, 30, 46),
            pill_key_bg: Color::Rgb(203, 166, 247),
            pill_desc_fg: Color::Rgb(205, 214, 244),
        }
    }
}
