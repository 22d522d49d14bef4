use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub paused_bg: Color,
    pub paused_fg: Color,
    /// idle, low, busy, saturated
    pub heat_colors: [Color; 4],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Color for a CPU percentage cell.
    pub fn heat(&self, cpu_percent: f64) -> Color {
        let idx = if cpu_percent < 1.0 {
            0
        } else if cpu_percent < 25.0 {
            1
        } else if cpu_percent < 75.0 {
            2
        } else {
            3
        };
        self.heat_colors[idx]
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            paused_bg: Color::Rgb(239, 68, 68),
            paused_fg: Color::Black,
            heat_colors: [
                Color::Rgb(71, 85, 105),
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            paused_bg: Color::Rgb(200, 60, 60),
            paused_fg: Color::White,
            heat_colors: [
                Color::Rgb(180, 180, 180),
                Color::Rgb(100, 180, 100),
                Color::Rgb(220, 120, 80),
                Color::Rgb(200, 60, 60),
            ],
        }
    }
}
