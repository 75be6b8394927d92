use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Light squares
    pub light_square: Color,
    /// Dark squares
    pub dark_square: Color,
    /// Row currently being searched
    pub highlight_bg: Color,
    /// Queen glyph color
    pub queen: Color,
    /// Queen glyph color once the board is a solution
    pub solved: Color,
    /// Rank and file labels
    pub label: Color,
    /// Status banners ([PAUSED], [STOPPING...])
    pub warning: Color,
    /// Info panel text
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            light_square: Color::Rgb { r: 120, g: 110, b: 95 },
            dark_square: Color::Rgb { r: 60, g: 52, b: 45 },
            highlight_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            queen: Color::Rgb { r: 255, g: 255, b: 255 },
            solved: Color::Rgb { r: 90, g: 255, b: 130 },
            label: Color::Rgb { r: 130, g: 140, b: 170 },
            warning: Color::Rgb { r: 255, g: 210, b: 100 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            light_square: Color::Rgb { r: 240, g: 217, b: 181 },
            dark_square: Color::Rgb { r: 181, g: 136, b: 99 },
            highlight_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            queen: Color::Rgb { r: 0, g: 0, b: 0 },
            solved: Color::Rgb { r: 20, g: 120, b: 40 },
            label: Color::Rgb { r: 60, g: 60, b: 80 },
            warning: Color::Rgb { r: 200, g: 120, b: 20 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// Square background for a board coordinate
    pub fn square(&self, row: usize, col: usize) -> Color {
        if (row + col) % 2 == 0 {
            self.light_square
        } else {
            self.dark_square
        }
    }
}
