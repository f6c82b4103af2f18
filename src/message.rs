//! Bordered message box drawn next to the tree.
//!
//! The box size is estimated once from the message length before layout.
//! Text that does not fit the estimate is cut off at the bottom of the box.

use crate::canvas::Layer;
use crate::colors::{Attr, GRAY};

/// Attribute of the `+-|` border
const BORDER: Attr = Attr::new(GRAY, true);

/// The border and text layers of an attached message
#[derive(Clone, Debug)]
pub struct MessageBox {
    border: Layer,
    text: Layer,
}

impl MessageBox {
    /// Size, place and lay out a message for a terminal of `cols` x `rows`
    pub fn new(message: &str, cols: u16, rows: u16) -> Self {
        let (width, height) = box_size(message, cols);
        let top = (rows as f64 * 0.7) as i32;
        let left = (cols as f64 * 0.7) as i32;
        let border_top = (rows as f64 * 0.7 - 1.0) as i32;
        let border_left = (cols as f64 * 0.7 - 2.0) as i32;

        let mut border = Layer::new(border_left, border_top, width + 4, height + 2, true);
        draw_border(&mut border);

        let text_width = width + 1;
        let mut text = Layer::new(left, top, text_width, height, true);
        let max_width = (text_width as usize).saturating_sub(2);
        for (y, line) in wrap(message, max_width, text_width as usize)
            .iter()
            .take(height as usize)
            .enumerate()
        {
            text.set_str(0, y as i32, line, Attr::plain());
        }

        Self { border, text }
    }

    pub fn border(&self) -> &Layer {
        &self.border
    }

    pub fn text(&self) -> &Layer {
        &self.text
    }
}

/// Estimate the text area (width, height) of the box.
///
/// Short messages get a single line; longer ones a quarter of the terminal
/// width and twice as many rows as full-width lines the message would need.
pub fn box_size(message: &str, cols: u16) -> (u16, u16) {
    let len = message.chars().count();
    let quarter = cols as f64 * 0.25;

    if (len + 3) as f64 <= quarter {
        ((len + 1) as u16, 1)
    } else {
        let width = (quarter as usize).max(1);
        let height = (2 * (len / width)).max(1);
        (width as u16, height.min(u16::MAX as usize) as u16)
    }
}

fn draw_border(layer: &mut Layer) {
    let (w, h) = layer.size();
    let (right, bottom) = (w as i32 - 1, h as i32 - 1);

    for x in 1..right {
        layer.set(x, 0, '-', BORDER);
        layer.set(x, bottom, '-', BORDER);
    }
    for y in 1..bottom {
        layer.set(0, y, '|', BORDER);
        layer.set(right, y, '|', BORDER);
    }
    for (x, y) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
        layer.set(x, y, '+', BORDER);
    }
}

/// Output position inside the text window; wraps at the window edge like a
/// terminal cursor does.
struct Cursor {
    width: usize,
    col: usize,
    rows: Vec<String>,
}

impl Cursor {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            col: 0,
            rows: vec![String::new()],
        }
    }

    fn put(&mut self, ch: char) {
        if ch == '\n' {
            self.newline();
            return;
        }
        if let Some(row) = self.rows.last_mut() {
            row.push(ch);
        }
        self.col += 1;
        if self.col >= self.width {
            self.newline();
        }
    }

    fn put_str(&mut self, s: &str) {
        s.chars().for_each(|c| self.put(c));
    }

    fn newline(&mut self) {
        self.rows.push(String::new());
        self.col = 0;
    }

    fn finish(mut self) -> Vec<String> {
        while self.rows.len() > 1 && self.rows.last().is_some_and(|r| r.is_empty()) {
            self.rows.pop();
        }
        self.rows
    }
}

/// Word-wrap a message into rows of a window `window_width` columns wide,
/// keeping lines within `max_width` characters where words allow.
///
/// Words longer than `max_width` are written unbroken and left to the
/// window's own wrapping.
pub fn wrap(message: &str, max_width: usize, window_width: usize) -> Vec<String> {
    let mut cursor = Cursor::new(window_width);
    let mut word = String::new();
    let mut word_len = 0;
    let mut line_pos = 0;

    for ch in message.chars().map(Some).chain(std::iter::once(None)) {
        match ch {
            Some(c) if !c.is_whitespace() => {
                word.push(c);
                word_len += 1;
                line_pos += 1;
            }
            trigger => {
                if line_pos <= max_width {
                    cursor.put_str(&word);
                    match trigger {
                        Some('\n') => {
                            cursor.put('\n');
                            line_pos = 0;
                        }
                        Some(_) => {
                            // A separator that would reach the edge ends the line instead
                            if line_pos + 1 < max_width {
                                cursor.put(' ');
                                line_pos += 1;
                            } else {
                                cursor.put('\n');
                                line_pos = 0;
                            }
                        }
                        None => {}
                    }
                } else if word_len > max_width {
                    cursor.put_str(&word);
                    cursor.put(' ');
                    line_pos = cursor.col;
                } else {
                    cursor.put('\n');
                    cursor.put_str(&word);
                    cursor.put(' ');
                    line_pos = word_len;
                }
                word.clear();
                word_len = 0;
            }
        }
    }

    cursor.finish()
}
