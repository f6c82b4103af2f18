//! Layered drawing surface.
//!
//! A canvas is a fixed stack of layers sized once from the terminal: the tree,
//! the base art above it, then the optional message border and message text.
//! `composite` flattens the stack into a [`Frame`] for presenting or printing.

use crate::base;
use crate::colors::{sgr_foreground, Attr};
use crate::config::BaseArt;
use crate::message::MessageBox;
use unicode_width::UnicodeWidthChar;

/// A single cell in a layer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
    /// Right half of a double-width glyph drawn in the cell to the left
    pub continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: Attr::plain(),
            continuation: false,
        }
    }
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && !self.continuation
    }
}

/// A rectangular grid positioned on the screen
#[derive(Clone, Debug)]
pub struct Layer {
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    cells: Vec<Vec<Cell>>,
    /// Opaque layers hide everything below them, blanks included
    opaque: bool,
}

impl Layer {
    pub fn new(x: i32, y: i32, width: u16, height: u16, opaque: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            cells: vec![vec![Cell::default(); width as usize]; height as usize],
            opaque,
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.contains(x, y) {
            Some(&self.cells[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Set a character at a layer-relative position. Out of bounds writes are
    /// dropped. Returns the number of columns used.
    pub fn set(&mut self, x: i32, y: i32, ch: char, attr: Attr) -> i32 {
        let width = match UnicodeWidthChar::width(ch) {
            Some(w) if w > 0 => w as i32,
            _ => return 0,
        };
        if !self.contains(x, y) || !self.contains(x + width - 1, y) {
            return 0;
        }

        for col in x..x + width {
            self.split_wide(col, y);
        }

        let row = &mut self.cells[y as usize];
        row[x as usize] = Cell {
            ch,
            attr,
            continuation: false,
        };
        for col in x + 1..x + width {
            row[col as usize] = Cell {
                ch: ' ',
                attr,
                continuation: true,
            };
        }
        width
    }

    /// Write a string starting at a layer-relative position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, attr: Attr) {
        let mut col = x;
        for ch in s.chars() {
            let used = self.set(col, y, ch, attr);
            col += used.max(UnicodeWidthChar::width(ch).unwrap_or(0) as i32);
        }
    }

    fn split_wide(&mut self, x: i32, y: i32) {
        clear_wide(&mut self.cells[y as usize], x as usize);
    }

    /// Plain text of one row, for overlays and tests
    pub fn line(&self, y: i32) -> String {
        if y < 0 || y >= self.height as i32 {
            return String::new();
        }
        self.cells[y as usize]
            .iter()
            .filter(|c| !c.continuation)
            .map(|c| c.ch)
            .collect()
    }

    /// Copy this layer onto a frame one glyph at a time, so a wide glyph is
    /// either placed whole or not at all
    fn stamp(&self, frame: &mut Frame, mono: bool) {
        for (ly, row) in self.cells.iter().enumerate() {
            let sy = self.y + ly as i32;
            if sy < 0 || sy >= frame.height as i32 {
                continue;
            }
            let target = &mut frame.cells[sy as usize];

            let mut lx = 0;
            while lx < row.len() {
                let span = 1 + row[lx + 1..].iter().take_while(|c| c.continuation).count();
                let glyph = &row[lx..lx + span];
                let sx = self.x + lx as i32;
                lx += span;

                if glyph[0].continuation || (!self.opaque && glyph[0].is_blank()) {
                    continue;
                }
                if sx < 0 || sx + span as i32 > frame.width as i32 {
                    continue;
                }

                let start = sx as usize;
                for col in start..start + span {
                    clear_wide(target, col);
                }
                for (cell, slot) in glyph.iter().zip(&mut target[start..start + span]) {
                    *slot = cell.clone();
                    if mono {
                        slot.attr.fg = None;
                    }
                }
            }
        }
    }
}

/// Blank both halves of a wide glyph that is about to be partly overwritten
/// at `idx`
fn clear_wide(row: &mut [Cell], idx: usize) {
    if row[idx].continuation {
        let mut lead = idx;
        while lead > 0 && row[lead].continuation {
            lead -= 1;
        }
        for cell in &mut row[lead..=idx] {
            *cell = Cell::default();
        }
    }
    let mut tail = idx + 1;
    while tail < row.len() && row[tail].continuation {
        row[tail] = Cell::default();
        tail += 1;
    }
}

/// The full drawing surface for one tree
pub struct Canvas {
    width: u16,
    height: u16,
    mono: bool,
    tree: Layer,
    base: Layer,
    message: Option<MessageBox>,
}

impl Canvas {
    /// Allocate the layers for a terminal of the given size and pre-draw the
    /// base art and message.
    pub fn new(width: u16, height: u16, base_art: BaseArt, mono: bool, message: Option<&str>) -> Self {
        let (base_w, base_h) = base_art.dimensions();

        let mut base_y = height as i32 - base_h as i32;
        if base_art == BaseArt::Roots {
            // Roots overlap the bottom tree row so the trunk joins the flare
            base_y -= 1;
        }
        let base_x = width as i32 / 2 - base_w as i32 / 2;

        let mut base = Layer::new(base_x, base_y, base_w, base_h, false);
        base::draw(&mut base, base_art);

        let tree = Layer::new(0, 0, width, height.saturating_sub(base_h), false);
        let message = message.map(|text| MessageBox::new(text, width, height));

        Self {
            width,
            height,
            mono,
            tree,
            base,
            message,
        }
    }

    pub fn tree(&self) -> &Layer {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Layer {
        &mut self.tree
    }

    pub fn base(&self) -> &Layer {
        &self.base
    }

    /// Layers in stacking order, bottom first
    fn layers(&self) -> impl Iterator<Item = &Layer> {
        let message = self
            .message
            .iter()
            .flat_map(|m| [m.border(), m.text()]);
        [&self.tree, &self.base].into_iter().chain(message)
    }

    /// Merge every layer into one frame
    pub fn composite(&self) -> Frame {
        let mut frame = Frame::new(self.width, self.height);
        for layer in self.layers() {
            layer.stamp(&mut frame, self.mono);
        }
        frame
    }
}

/// A flattened screen image
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    /// Plain text rows without styling
    pub fn text(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| !c.continuation).map(|c| c.ch).collect())
            .collect()
    }

    /// Styled text rows with SGR attributes, one per screen row
    pub fn snapshot(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                let mut line = String::new();
                let mut current = Attr::plain();
                for cell in row.iter().filter(|c| !c.continuation) {
                    if cell.attr != current {
                        line.push_str("\x1b[0m");
                        if cell.attr.bold {
                            line.push_str("\x1b[1m");
                        }
                        if let Some(code) = cell.attr.fg.and_then(sgr_foreground) {
                            line.push_str(&code);
                        }
                        current = cell.attr;
                    }
                    line.push(cell.ch);
                }
                if current != Attr::plain() {
                    line.push_str("\x1b[0m");
                }
                line
            })
            .collect()
    }
}
