//! Drives tree growth: seeding, one or more growth cycles, the pause between
//! trees in infinite mode, and the save file.

use crate::bonsai::Grower;
use crate::canvas::{Canvas, Frame};
use crate::config::BonsaiConfig;
use crate::error::{GrowError, PersistError, SessionError};
use crate::persist::{self, SavedTree};
use crate::terminal::{is_quit, Screen};
use crossterm::event::{Event, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Current UNIX time in whole seconds
pub fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) // Fallback seed for misconfigured system clocks
}

/// Apply a save file to the configuration, returning the branch count the
/// restored tree should reach before animation starts.
///
/// A missing or malformed file prints a warning and leaves the seed alone.
pub fn restore(config: &mut BonsaiConfig) -> u32 {
    let Some(path) = config.load.as_deref() else {
        return 0;
    };

    match persist::load(path) {
        Ok(saved) => {
            tracing::info!(seed = saved.seed, branches = saved.branches, path = %path.display(), "restored tree");
            config.seed = saved.seed;
            saved.branches
        }
        Err(err) => {
            tracing::warn!(%err, "could not restore tree");
            println!("error: {err}");
            0
        }
    }
}

/// What a finished session leaves behind
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// Seed of the last tree grown
    pub seed: u64,
    /// Branches grown in the last tree, partial if it was interrupted
    pub branches: u32,
    /// Number of trees started
    pub trees: u32,
    /// The last fully grown tree
    pub frame: Option<Frame>,
    /// True when the user quit
    pub cancelled: bool,
}

impl Report {
    /// Write `<seed> <branches>` so the tree can be restored later
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persist::save(
            path,
            SavedTree {
                seed: self.seed,
                branches: self.branches,
            },
        )?;
        tracing::info!(seed = self.seed, branches = self.branches, path = %path.display(), "saved tree");
        Ok(())
    }
}

pub struct Session<'a, S: Screen> {
    config: &'a BonsaiConfig,
    screen: &'a mut S,
    clock: Box<dyn FnMut() -> u64 + 'a>,
}

impl<'a, S: Screen> Session<'a, S> {
    pub fn new(config: &'a BonsaiConfig, screen: &'a mut S) -> Self {
        Self {
            config,
            screen,
            clock: Box::new(unix_time),
        }
    }

    /// Replace the seed source used for seed 0 and for each new tree in
    /// infinite mode
    pub fn with_clock(mut self, clock: impl FnMut() -> u64 + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Grow trees until done, interrupted, or (infinite mode) told to quit.
    /// `target_branches` comes from [`restore`].
    pub fn run(mut self, target_branches: u32) -> Result<Report, SessionError> {
        let mut report = Report::default();
        match self.cycle(target_branches, &mut report) {
            Ok(()) => Ok(report),
            Err(source) => {
                tracing::warn!(%source, branches = report.branches, "session failed");
                Err(SessionError { report, source })
            }
        }
    }

    fn cycle(&mut self, target_branches: u32, report: &mut Report) -> io::Result<()> {
        let config = self.config;
        let mut seed = match config.seed {
            0 => (self.clock)(),
            seed => seed,
        };
        let mut target = target_branches;

        loop {
            report.trees += 1;
            report.seed = seed;
            tracing::info!(seed, cycle = report.trees, "growing tree");

            let (width, height) = self.screen.size();
            let mut canvas = Canvas::new(width, height, config.base, config.mono, config.message.as_deref());
            let mut rng = StdRng::seed_from_u64(seed);

            let mut grower = Grower::new(config, &mut canvas, &mut *self.screen, &mut rng, target);
            let outcome = grower.grow_tree();
            report.branches = grower.counters().branches;
            tracing::debug!(branches = report.branches, shoots = grower.counters().shoots, "tree finished");

            match outcome {
                Ok(()) => {}
                Err(GrowError::Cancelled) => {
                    tracing::info!(branches = report.branches, "interrupted");
                    report.cancelled = true;
                    return Ok(());
                }
                Err(GrowError::Io(err)) => return Err(err),
            }

            let frame = canvas.composite();
            self.screen.present(&frame)?;
            report.frame = Some(frame);

            // Only the first tree is restored
            target = 0;

            if config.print {
                return Ok(());
            }

            if !config.infinite {
                return self.wait_for_key();
            }

            if self.pause()? {
                report.cancelled = true;
                return Ok(());
            }
            seed = (self.clock)();
        }
    }

    /// Wait out the time between trees; true if the user asked to quit
    fn pause(&mut self) -> io::Result<bool> {
        let deadline = Instant::now() + Duration::from_secs_f64(self.config.time_wait);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.screen.poll_event(remaining)? {
                Some(event) if is_quit(&event, self.config.screensaver) => return Ok(true),
                Some(_) if !remaining.is_zero() => continue,
                _ => return Ok(false),
            }
        }
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        loop {
            if let Event::Key(key) = self.screen.wait_event()? {
                if key.kind != KeyEventKind::Release {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseArt;
    use crate::terminal::testing::MemoryScreen;
    use crossterm::event::KeyCode;
    use std::fs;

    fn config(seed: u64) -> BonsaiConfig {
        BonsaiConfig {
            seed,
            ..BonsaiConfig::default()
        }
    }

    fn run(config: &BonsaiConfig, screen: &mut MemoryScreen, target: u32) -> Report {
        Session::new(config, screen).run(target).unwrap()
    }

    #[test]
    fn same_seed_same_frame() {
        let config = config(42);
        let a = run(&config, &mut MemoryScreen::new(90, 30), 0);
        let b = run(&config, &mut MemoryScreen::new(90, 30), 0);
        assert_eq!(a.seed, 42);
        assert_eq!(a.branches, b.branches);
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.trees, 1);
        assert!(!a.cancelled);
    }

    #[test]
    fn seed_zero_reads_the_clock() {
        let config = config(0);
        let mut screen = MemoryScreen::new(80, 24);
        let report = Session::new(&config, &mut screen).with_clock(|| 777).run(0).unwrap();
        assert_eq!(report.seed, 777);
    }

    #[test]
    fn screensaver_key_ends_session_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree");
        let config = BonsaiConfig {
            live: true,
            infinite: true,
            screensaver: true,
            save: Some(path.clone()),
            ..config(31)
        };

        let mut screen = MemoryScreen::new(100, 30).key_on_poll(6, KeyCode::Char('x'));
        let report = run(&config, &mut screen, 0);

        assert!(report.cancelled);
        assert_eq!(report.trees, 1);
        assert_eq!(screen.polls(), 6);
        // At most five steps were shown before the key was seen
        assert!(screen.presented <= 5);
        assert!(report.frame.is_none());

        report.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("31 {}", report.branches));
        assert!(report.branches >= 1);
    }

    #[test]
    fn terminal_failure_keeps_partial_tree_for_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree");
        let config = BonsaiConfig {
            live: true,
            ..config(64)
        };

        let mut screen = MemoryScreen::new(100, 30).fail_after_presents(3);
        let err = Session::new(&config, &mut screen).run(0).unwrap_err();

        assert_eq!(err.source.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.report.seed, 64);
        assert!(err.report.branches >= 1);
        assert!(!err.report.cancelled);
        assert_eq!(screen.presented, 3);

        err.report.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("64 {}", err.report.branches));
    }

    #[test]
    fn restored_tree_matches_saved_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree");

        let saved = run(&config(1234), &mut MemoryScreen::new(100, 30), 0);
        saved.save(&path).unwrap();

        let mut config = BonsaiConfig {
            live: true,
            load: Some(path),
            ..config(5)
        };
        let target = restore(&mut config);
        assert_eq!(config.seed, 1234);
        assert_eq!(target, saved.branches);

        let mut screen = MemoryScreen::new(100, 30);
        let restored = run(&config, &mut screen, target);
        assert_eq!(restored.branches, saved.branches);
        assert_eq!(restored.frame, saved.frame);
    }

    #[test]
    fn malformed_save_file_keeps_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree");
        fs::write(&path, "42").unwrap();

        let mut config = BonsaiConfig {
            load: Some(path),
            ..config(9)
        };
        assert_eq!(restore(&mut config), 0);
        assert_eq!(config.seed, 9);

        config.load = Some(dir.path().join("missing"));
        assert_eq!(restore(&mut config), 0);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn infinite_mode_reseeds_each_tree() {
        let config = BonsaiConfig {
            infinite: true,
            time_wait: 0.0,
            life_start: 8,
            multiplier: 1,
            base: BaseArt::None,
            ..config(5)
        };
        let mut next = 100;
        let mut screen = MemoryScreen::new(60, 20).key_on_poll(2000, KeyCode::Char('q'));
        let report = Session::new(&config, &mut screen)
            .with_clock(move || {
                next += 1;
                next - 1
            })
            .run(0)
            .unwrap();

        assert!(report.cancelled);
        assert!(report.trees > 1);
        assert_eq!(report.seed, 100 + (report.trees as u64 - 2));
    }

    #[test]
    fn print_mode_grows_one_tree() {
        let config = BonsaiConfig {
            print: true,
            infinite: true,
            message: Some("hello".to_string()),
            ..config(3)
        };
        let mut screen = MemoryScreen::new(80, 24);
        let report = run(&config, &mut screen, 0);
        assert_eq!(report.trees, 1);
        let text = report.frame.map(|f| f.text()).unwrap_or_default();
        assert!(text.iter().any(|row| row.contains("hello")));
    }
}
