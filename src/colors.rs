use crate::config::BranchKind;
use crossterm::style::Color;
use rand::Rng;

// Wood colors - use yellow/dark yellow for brown-like appearance
pub const WOOD_DARK: Color = Color::DarkYellow;
pub const WOOD_LIGHT: Color = Color::Yellow;

// Leaf colors - use green shades
pub const LEAF_DARK: Color = Color::DarkGreen;
pub const LEAF_LIGHT: Color = Color::Green;

// Pot and message border
pub const GRAY: Color = Color::DarkGrey;

/// Display attribute for a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attr {
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Attr {
    pub const fn new(fg: Color, bold: bool) -> Self {
        Self { fg: Some(fg), bold }
    }

    pub const fn plain() -> Self {
        Self { fg: None, bold: false }
    }
}

/// Pick the attribute for a branch step.
///
/// Mono mode consumes the same random draws so a seed grows the same tree
/// with or without color.
pub fn choose<R: Rng + ?Sized>(rng: &mut R, kind: BranchKind, mono: bool) -> Attr {
    let attr = match kind {
        BranchKind::Trunk | BranchKind::ShootLeft | BranchKind::ShootRight => {
            if rng.gen_range(0..2) == 0 {
                Attr::new(WOOD_LIGHT, true)
            } else {
                Attr::new(WOOD_DARK, false)
            }
        }
        BranchKind::Dying => Attr::new(LEAF_DARK, rng.gen_range(0..10) == 0),
        BranchKind::Dead => Attr::new(LEAF_LIGHT, rng.gen_range(0..3) == 0),
    };

    if mono {
        Attr { fg: None, bold: attr.bold }
    } else {
        attr
    }
}

/// SGR foreground code for a color, if it has one
pub fn sgr_foreground(color: Color) -> Option<String> {
    let code = match color {
        Color::Rgb { r, g, b } => return Some(format!("\x1b[38;2;{};{};{}m", r, g, b)),
        Color::AnsiValue(v) => return Some(format!("\x1b[38;5;{}m", v)),
        // Standard colors (0-7)
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        // Bright colors (8-15)
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        _ => return None,
    };
    Some(format!("\x1b[{}m", code))
}
