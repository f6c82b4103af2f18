//! Recursive branch growth.
//!
//! A branch walks cell by cell, spending one unit of life per step, and may
//! spawn child branches along the way. Children are grown to completion
//! before the parent takes its next step, so a seed always replays the same
//! sequence of random draws.

use crate::canvas::Canvas;
use crate::colors::{self, Attr};
use crate::config::{BonsaiConfig, BranchKind, Counters};
use crate::direction;
use crate::error::GrowError;
use crate::glyph;
use crate::terminal::{is_quit, Screen};
use rand::Rng;
use std::time::Duration;

/// One glyph placed (or skipped) by a branch step
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Ordinal of the branch that made this stroke, starting at 1
    pub branch: u32,
    pub x: i32,
    pub y: i32,
    pub kind: BranchKind,
    /// Life remaining after this step
    pub life: i32,
    pub glyph: String,
    /// False when the wide-glyph guard or the layer bounds dropped the write
    pub drawn: bool,
}

/// Grows one tree onto a canvas
pub struct Grower<'a, R: Rng, S: Screen> {
    config: &'a BonsaiConfig,
    canvas: &'a mut Canvas,
    screen: &'a mut S,
    rng: &'a mut R,
    counters: Counters,
    /// Branch count of a restored tree; animation is skipped until reached
    target_branches: u32,
    /// Step log, only kept when asked for
    strokes: Option<Vec<Stroke>>,
}

impl<'a, R: Rng, S: Screen> Grower<'a, R, S> {
    pub fn new(
        config: &'a BonsaiConfig,
        canvas: &'a mut Canvas,
        screen: &'a mut S,
        rng: &'a mut R,
        target_branches: u32,
    ) -> Self {
        Self {
            config,
            canvas,
            screen,
            rng,
            counters: Counters::default(),
            target_branches,
            strokes: None,
        }
    }

    /// Keep a [`Stroke`] for every step taken
    pub fn record_strokes(mut self) -> Self {
        self.strokes = Some(Vec::new());
        self
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Steps recorded so far; empty unless recording was enabled
    pub fn strokes(&self) -> &[Stroke] {
        self.strokes.as_deref().unwrap_or_default()
    }

    /// Grow the trunk from the bottom center of the tree layer
    pub fn grow_tree(&mut self) -> Result<(), GrowError> {
        let (width, height) = self.canvas.tree().size();

        self.counters = Counters {
            shoot_counter: self.rng.gen(),
            ..Counters::default()
        };

        if self.config.verbosity > 0 {
            let dims = format!("maxX: {:03}, maxY: {:03}", width, height);
            self.overlay(2, &dims);
        }

        self.branch(
            width as i32 / 2,
            height as i32 - 1,
            BranchKind::Trunk,
            self.config.life_start as i32,
        )
    }

    fn branch(&mut self, mut x: i32, mut y: i32, kind: BranchKind, mut life: i32) -> Result<(), GrowError> {
        self.counters.branches += 1;
        let id = self.counters.branches;

        let config = self.config;
        let multiplier = config.multiplier as i32;
        let life_start = config.life_start as i32;
        let floor = self.canvas.tree().size().1 as i32;
        let mut shoot_cooldown = multiplier;

        while life > 0 {
            self.check_quit()?;

            life -= 1;
            let age = life_start - life;

            let (dx, dy) = direction::deltas(&mut *self.rng, kind, life, age, multiplier, config.base);
            let dy = direction::clamp_to_floor(dy, y, floor);

            if life < 3 {
                // Near the end: break up into leaves
                self.branch(x, y, BranchKind::Dead, life)?;
            } else if kind == BranchKind::Trunk && life < multiplier + 2 {
                self.branch(x, y, BranchKind::Dying, life)?;
            } else if kind.is_shoot() && life < multiplier + 2 {
                self.branch(x, y, BranchKind::Dying, life)?;
            } else if kind == BranchKind::Trunk
                && (self.rng.gen_range(0..3) == 0 || (multiplier != 0 && life % multiplier == 0))
            {
                if self.rng.gen_range(0..8) == 0 && life > 7 {
                    shoot_cooldown = multiplier * 2;
                    let sibling_life = life + self.rng.gen_range(-2..=2);
                    self.branch(x, y, BranchKind::Trunk, sibling_life)?;
                } else if shoot_cooldown <= 0 {
                    shoot_cooldown = multiplier * 2;

                    self.counters.shoots += 1;
                    self.counters.shoot_counter = self.counters.shoot_counter.wrapping_add(1);
                    if config.verbosity > 0 {
                        let shoots = format!("shoots: {:02}", self.counters.shoots);
                        self.overlay(4, &shoots);
                    }

                    let side = if self.counters.shoot_counter % 2 == 0 {
                        BranchKind::ShootLeft
                    } else {
                        BranchKind::ShootRight
                    };
                    self.branch(x, y, side, life + multiplier)?;
                }
            }
            shoot_cooldown -= 1;

            if config.verbosity > 0 {
                self.overlay(5, &format!("dx: {:02}", dx));
                self.overlay(6, &format!("dy: {:02}", dy));
                self.overlay(7, &format!("type: {}", kind.label()));
                self.overlay(8, &format!("shootCooldown: {:3}", shoot_cooldown));
            }

            x += dx;
            y += dy;

            let attr = colors::choose(&mut *self.rng, kind, config.mono);
            let glyph = glyph::choose(
                &mut *self.rng,
                kind,
                life,
                age,
                dx,
                dy,
                config.base,
                &config.leaves,
            );

            // Wide glyphs only start on columns they evenly divide
            let drawn = x % glyph::display_width(&glyph) == 0 && self.canvas.tree().contains(x, y);
            if drawn {
                self.canvas.tree_mut().set_str(x, y, &glyph, attr);
            }

            if let Some(strokes) = self.strokes.as_mut() {
                strokes.push(Stroke {
                    branch: id,
                    x,
                    y,
                    kind,
                    life,
                    glyph: glyph.into_owned(),
                    drawn,
                });
            }

            if config.live && !self.catching_up() {
                let frame = self.canvas.composite();
                self.screen.present(&frame)?;
                self.screen.sleep(Duration::from_secs_f64(config.time_step));
            }
        }

        Ok(())
    }

    /// A restored tree is redrawn without animation until it reaches its
    /// saved size
    fn catching_up(&self) -> bool {
        self.counters.branches < self.target_branches
    }

    fn check_quit(&mut self) -> Result<(), GrowError> {
        if let Some(event) = self.screen.poll_event(Duration::ZERO)? {
            if is_quit(&event, self.config.screensaver) {
                return Err(GrowError::Cancelled);
            }
        }
        Ok(())
    }

    /// Debug text drawn onto the tree layer in verbose mode
    fn overlay(&mut self, row: i32, text: &str) {
        self.canvas.tree_mut().set_str(5, row, text, Attr::plain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseArt;
    use crate::terminal::testing::MemoryScreen;
    use crossterm::event::KeyCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn config(life: u32, multiplier: u32, base: BaseArt) -> BonsaiConfig {
        BonsaiConfig {
            life_start: life,
            multiplier,
            base,
            ..BonsaiConfig::default()
        }
    }

    struct Grown {
        counters: Counters,
        strokes: Vec<Stroke>,
        text: Vec<String>,
        result: Result<(), GrowError>,
    }

    fn grow(config: &BonsaiConfig, seed: u64, screen: &mut MemoryScreen) -> Grown {
        let (w, h) = screen.size();
        let mut canvas = Canvas::new(w, h, config.base, config.mono, None);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grower = Grower::new(config, &mut canvas, screen, &mut rng, 0).record_strokes();
        let result = grower.grow_tree();
        let counters = grower.counters().clone();
        let strokes = grower.strokes().to_vec();
        Grown {
            counters,
            strokes,
            text: canvas.composite().text(),
            result,
        }
    }

    #[test]
    fn minimal_tree_terminates_inside_tree_layer() {
        let config = config(5, 1, BaseArt::None);
        let mut screen = MemoryScreen::new(60, 20);
        let grown = grow(&config, 1, &mut screen);

        assert!(grown.result.is_ok());
        assert!(grown.counters.branches >= 1);
        for stroke in &grown.strokes {
            let inside = (0..60).contains(&stroke.x) && (0..20).contains(&stroke.y);
            assert!(!stroke.drawn || inside, "drawn outside: {stroke:?}");
        }
        assert_eq!(screen.presented, 0, "not live, nothing presented");
    }

    #[test]
    fn branch_count_is_number_of_grow_calls() {
        let config = config(32, 5, BaseArt::LargePot);
        let grown = grow(&config, 99, &mut MemoryScreen::new(120, 40));

        let ids: std::collections::BTreeSet<u32> = grown.strokes.iter().map(|s| s.branch).collect();
        // Every branch with life makes at least one stroke
        assert_eq!(ids.len() as u32, grown.counters.branches);
        assert_eq!(ids.iter().max().copied(), Some(grown.counters.branches));
        assert!(grown.counters.branches as usize <= grown.strokes.len());
    }

    #[test]
    fn life_falls_by_one_each_step_down_to_zero() {
        let config = config(40, 6, BaseArt::SmallPot);
        let grown = grow(&config, 2024, &mut MemoryScreen::new(100, 40));

        let mut per_branch: BTreeMap<u32, Vec<i32>> = BTreeMap::new();
        for stroke in &grown.strokes {
            per_branch.entry(stroke.branch).or_default().push(stroke.life);
        }
        for (branch, lives) in per_branch {
            assert_eq!(lives.last(), Some(&0), "branch {branch} stopped early");
            for pair in lives.windows(2) {
                assert_eq!(pair[0] - 1, pair[1], "branch {branch}: {lives:?}");
            }
        }
        // The trunk takes exactly life_start steps
        let trunk_steps = grown.strokes.iter().filter(|s| s.branch == 1).count();
        assert_eq!(trunk_steps, 40);
    }

    #[test]
    fn same_seed_same_tree() {
        let config = config(32, 5, BaseArt::LargePot);
        let a = grow(&config, 12345, &mut MemoryScreen::new(100, 30));
        let b = grow(&config, 12345, &mut MemoryScreen::new(100, 30));
        assert_eq!(a.counters.branches, b.counters.branches);
        assert_eq!(a.strokes, b.strokes);
        assert_eq!(a.text, b.text);

        let c = grow(&config, 54321, &mut MemoryScreen::new(100, 30));
        assert_ne!(a.strokes, c.strokes);
    }

    #[test]
    fn mono_grows_the_same_tree() {
        let color = config(32, 5, BaseArt::LargePot);
        let mono = BonsaiConfig { mono: true, ..color.clone() };
        let a = grow(&color, 8, &mut MemoryScreen::new(100, 30));
        let b = grow(&mono, 8, &mut MemoryScreen::new(100, 30));
        assert_eq!(a.strokes, b.strokes);
    }

    #[test]
    fn nearly_spent_steps_use_leaves() {
        let config = BonsaiConfig {
            leaves: vec!["@".to_string()],
            ..config(32, 5, BaseArt::None)
        };
        let grown = grow(&config, 77, &mut MemoryScreen::new(100, 30));
        for stroke in grown.strokes.iter().filter(|s| s.life < 4) {
            assert_eq!(stroke.glyph, "@", "{stroke:?}");
        }
    }

    #[test]
    fn quit_key_aborts_whole_tree() {
        let config = config(32, 5, BaseArt::None);
        let mut screen = MemoryScreen::new(100, 30).key_on_poll(10, KeyCode::Char('q'));
        let grown = grow(&config, 3, &mut screen);

        assert!(matches!(grown.result, Err(GrowError::Cancelled)));
        // One poll per step, and nothing runs after the key is seen
        assert!(grown.strokes.len() <= 9);
        assert_eq!(screen.polls(), 10);
        assert!(grown.counters.branches >= 1);
    }

    #[test]
    fn other_keys_do_not_abort_outside_screensaver() {
        let config = config(20, 5, BaseArt::None);
        let mut screen = MemoryScreen::new(100, 30).key_on_poll(3, KeyCode::Char('x'));
        assert!(grow(&config, 3, &mut screen).result.is_ok());
    }

    #[test]
    fn live_mode_presents_every_step() {
        let config = BonsaiConfig {
            live: true,
            time_step: 0.01,
            ..config(16, 3, BaseArt::SmallPot)
        };
        let mut screen = MemoryScreen::new(80, 24);
        let grown = grow(&config, 5, &mut screen);
        assert_eq!(screen.presented, grown.strokes.len());
        assert_eq!(screen.last_frame.map(|f| f.text()), Some(grown.text));
    }

    #[test]
    fn restored_tree_catches_up_without_animation() {
        let config = BonsaiConfig {
            live: true,
            ..config(32, 5, BaseArt::None)
        };
        let full = grow(&config, 42, &mut MemoryScreen::new(100, 30));
        let target = full.counters.branches;

        let mut screen = MemoryScreen::new(100, 30);
        let mut canvas = Canvas::new(100, 30, config.base, false, None);
        let mut rng = StdRng::seed_from_u64(42);
        let mut grower = Grower::new(&config, &mut canvas, &mut screen, &mut rng, target);
        grower.grow_tree().unwrap();
        assert!(grower.strokes().is_empty());
        assert_eq!(grower.counters().branches, target);
        drop(grower);
        // Only steps taken by the final branch are animated
        assert!(screen.presented < full.strokes.len());
    }

    #[test]
    fn organic_base_draws_dense_trunk() {
        let config = BonsaiConfig {
            leaves: crate::config::parse_leaves(crate::config::ROOTS_LEAVES),
            ..config(32, 5, BaseArt::Roots)
        };
        let grown = grow(&config, 10, &mut MemoryScreen::new(100, 30));
        let first = &grown.strokes[0];
        assert_eq!(first.kind, BranchKind::Trunk);
        assert!(first.glyph.contains('#'), "{first:?}");
    }

    #[test]
    fn verbose_overlay_writes_debug_fields() {
        let config = BonsaiConfig {
            verbosity: 1,
            ..config(12, 5, BaseArt::None)
        };
        let grown = grow(&config, 1, &mut MemoryScreen::new(80, 30));
        assert!(grown.text[2].contains("maxX: 080, maxY: 030"));
        assert!(grown.text[7].contains("type: "));
    }

    #[test]
    fn steps_are_only_logged_on_request() {
        let config = config(32, 5, BaseArt::LargePot);
        let mut screen = MemoryScreen::new(100, 30);
        let mut canvas = Canvas::new(100, 30, config.base, false, None);
        let mut rng = StdRng::seed_from_u64(12345);
        let mut grower = Grower::new(&config, &mut canvas, &mut screen, &mut rng, 0);
        grower.grow_tree().unwrap();
        assert!(grower.strokes().is_empty());
        let branches = grower.counters().branches;

        // Logging does not change the tree
        let logged = grow(&config, 12345, &mut MemoryScreen::new(100, 30));
        assert_eq!(logged.counters.branches, branches);
        assert!(!logged.strokes.is_empty());
    }
}
