use crate::canvas::Frame;
use crate::colors::Attr;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Size used when the terminal cannot be queried (output piped to a file)
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Where frames are shown and input comes from
pub trait Screen {
    /// Terminal dimensions (columns, rows)
    fn size(&self) -> (u16, u16);

    /// Draw a full frame
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Wait up to `timeout` for an input event. A zero timeout never blocks.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;

    /// Block until any input event arrives
    fn wait_event(&mut self) -> io::Result<Event>;

    fn sleep(&mut self, duration: Duration);
}

/// Whether an input event should end the session.
///
/// In screensaver mode any event quits; otherwise only `q` or Esc.
pub fn is_quit(event: &Event, any_input: bool) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Release => false,
        _ if any_input => true,
        Event::Key(key) => matches!(key.code, KeyCode::Char('q') | KeyCode::Esc),
        _ => false,
    }
}

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    alternate_screen: bool,
}

impl Terminal {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        Ok(Self {
            width,
            height,
            alternate_screen: true,
        })
    }

    /// A screen that only reports a size: nothing is drawn and no input is read
    pub fn detached() -> Self {
        let (width, height) = match size() {
            Ok((w, h)) if w > 0 && h > 0 => (w, h),
            _ => {
                tracing::debug!("terminal size unavailable, using {:?}", FALLBACK_SIZE);
                FALLBACK_SIZE
            }
        };

        Self {
            width,
            height,
            alternate_screen: false,
        }
    }
}

impl Screen for Terminal {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Render the entire frame to screen
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if !self.alternate_screen {
            return Ok(());
        }

        let mut out = stdout();
        for (y, row) in frame.rows().enumerate() {
            queue!(out, MoveTo(0, y as u16), SetAttribute(Attribute::Reset), ResetColor)?;
            let mut current = Attr::plain();

            for cell in row.iter().filter(|c| !c.continuation) {
                if cell.attr != current {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                    if cell.attr.bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    if let Some(color) = cell.attr.fg {
                        queue!(out, SetForegroundColor(color))?;
                    }
                    current = cell.attr;
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        out.flush()
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if self.alternate_screen && poll(timeout)? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    fn wait_event(&mut self) -> io::Result<Event> {
        read()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Clear(ClearType::All), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    /// In-memory screen with scripted input for session tests
    pub struct MemoryScreen {
        width: u16,
        height: u16,
        polls: usize,
        script: VecDeque<(usize, Event)>,
        fail_after: Option<usize>,
        pub presented: usize,
        pub last_frame: Option<Frame>,
        pub slept: Duration,
    }

    impl MemoryScreen {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                polls: 0,
                script: VecDeque::new(),
                fail_after: None,
                presented: 0,
                last_frame: None,
                slept: Duration::ZERO,
            }
        }

        /// Deliver a key press on the `nth` poll (1-based)
        pub fn key_on_poll(mut self, nth: usize, code: KeyCode) -> Self {
            self.script
                .push_back((nth, Event::Key(KeyEvent::new(code, KeyModifiers::NONE))));
            self
        }

        /// Fail every present after the first `n` succeed
        pub fn fail_after_presents(mut self, n: usize) -> Self {
            self.fail_after = Some(n);
            self
        }

        pub fn polls(&self) -> usize {
            self.polls
        }
    }

    impl Screen for MemoryScreen {
        fn size(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        fn present(&mut self, frame: &Frame) -> io::Result<()> {
            if self.fail_after.is_some_and(|n| self.presented >= n) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "screen closed"));
            }
            self.presented += 1;
            self.last_frame = Some(frame.clone());
            Ok(())
        }

        fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            self.polls += 1;
            match self.script.front() {
                Some(&(nth, _)) if nth <= self.polls => Ok(self.script.pop_front().map(|(_, e)| e)),
                _ => Ok(None),
            }
        }

        fn wait_event(&mut self) -> io::Result<Event> {
            Ok(self
                .script
                .pop_front()
                .map(|(_, e)| e)
                .unwrap_or_else(|| Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))))
        }

        fn sleep(&mut self, duration: Duration) {
            self.slept += duration;
        }
    }
}
