use crate::config::{
    parse_leaves, BaseArt, BonsaiConfig, DEFAULT_LEAVES, DEFAULT_LIFE, DEFAULT_MULTIPLIER,
    DEFAULT_TIME_STEP, DEFAULT_TIME_WAIT, ROOTS_LEAVES,
};
use crate::persist;
use crate::settings::BonsaiSettings;
use clap::{value_parser, ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "termbonsai")]
#[command(version)]
#[command(about = "Grow a bonsai tree in your terminal", long_about = None)]
pub struct Cli {
    /// Live mode: show each step of growth
    #[arg(short, long)]
    pub live: bool,

    /// In live mode, wait TIME secs between steps of growth [default: 0.03]
    #[arg(short, long, value_name = "TIME", value_parser = positive_seconds)]
    pub time: Option<f64>,

    /// Infinite mode: keep growing trees
    #[arg(short, long)]
    pub infinite: bool,

    /// In infinite mode, wait TIME secs between each tree [default: 4]
    #[arg(short, long, value_name = "TIME", value_parser = non_negative_seconds)]
    pub wait: Option<f64>,

    /// Screensaver mode; equivalent to -liWC and quit on any keypress
    #[arg(short = 'S', long)]
    pub screensaver: bool,

    /// Attach message next to the tree
    #[arg(short, long, value_name = "STR")]
    pub message: Option<String>,

    /// Ascii-art plant base to use, 0 is none, 3 is roots [default: 1]
    #[arg(short, long, value_name = "INT", allow_negative_numbers = true)]
    pub base: Option<i64>,

    /// List of comma-delimited strings randomly chosen for leaves [default: &]
    #[arg(short = 'c', long, value_name = "LIST")]
    pub leaf: Option<String>,

    /// Branch multiplier; higher -> more branching (0-20) [default: 5]
    #[arg(short = 'M', long, value_name = "INT", value_parser = value_parser!(u32).range(0..=20))]
    pub multiplier: Option<u32>,

    /// Life; higher -> more growth (0-200) [default: 32]
    #[arg(short = 'L', long, value_name = "INT", value_parser = value_parser!(u32).range(0..=200))]
    pub life: Option<u32>,

    /// Print tree to terminal when finished
    #[arg(short, long)]
    pub print: bool,

    /// Seed random number generator
    #[arg(short, long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Save progress to file [default: $XDG_CACHE_HOME/termbonsai]
    #[arg(short = 'W', long, value_name = "FILE", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,

    /// Load progress from file [default: $XDG_CACHE_HOME/termbonsai]
    #[arg(short = 'C', long, value_name = "FILE", num_args = 0..=1)]
    pub load: Option<Option<PathBuf>>,

    /// Increase output verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Don't use color
    #[arg(short, long)]
    pub noir: bool,
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("`{s}` is not a number of seconds"))
}

fn positive_seconds(s: &str) -> Result<f64, String> {
    let secs = parse_seconds(s)?;
    if secs > 0.0 {
        Ok(secs)
    } else {
        Err("delay must be positive".to_string())
    }
}

fn non_negative_seconds(s: &str) -> Result<f64, String> {
    let secs = parse_seconds(s)?;
    if secs >= 0.0 {
        Ok(secs)
    } else {
        Err("delay must be non-negative".to_string())
    }
}

impl Cli {
    /// Merge with settings file defaults; command line values win
    pub fn into_config(self, defaults: &BonsaiSettings) -> BonsaiConfig {
        let base = self
            .base
            .or(defaults.base)
            .map(BaseArt::from_index)
            .unwrap_or(BaseArt::LargePot);

        let leaves = match self.leaf.or_else(|| defaults.leaves.clone()) {
            Some(list) => parse_leaves(&list),
            None if base == BaseArt::Roots => parse_leaves(ROOTS_LEAVES),
            None => parse_leaves(DEFAULT_LEAVES),
        };

        let screensaver = self.screensaver;
        let save = match self.save {
            Some(path) => Some(path.unwrap_or_else(persist::default_path)),
            None if screensaver => Some(persist::default_path()),
            None => None,
        };
        let load = match self.load {
            Some(path) => Some(path.unwrap_or_else(persist::default_path)),
            None if screensaver => Some(persist::default_path()),
            None => None,
        };

        // Print mode grows a single tree without animation
        let print = self.print;

        BonsaiConfig {
            live: (self.live || screensaver) && !print,
            infinite: (self.infinite || screensaver) && !print,
            screensaver,
            print,
            mono: self.noir || defaults.noir.unwrap_or(false),
            verbosity: self.verbose,
            time_step: self
                .time
                .or(defaults.time.filter(|t| *t > 0.0))
                .unwrap_or(DEFAULT_TIME_STEP),
            time_wait: self
                .wait
                .or(defaults.wait.filter(|w| *w >= 0.0))
                .unwrap_or(DEFAULT_TIME_WAIT),
            life_start: self.life.or(defaults.life).unwrap_or(DEFAULT_LIFE).min(200),
            multiplier: self
                .multiplier
                .or(defaults.multiplier)
                .unwrap_or(DEFAULT_MULTIPLIER)
                .min(20),
            base,
            leaves,
            message: self.message,
            seed: self.seed.unwrap_or(0),
            save,
            load,
        }
    }
}
