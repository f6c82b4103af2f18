use std::path::PathBuf;

/// Default initial branch life
pub const DEFAULT_LIFE: u32 = 32;
/// Default branch multiplier
pub const DEFAULT_MULTIPLIER: u32 = 5;
/// Default seconds between growth steps in live mode
pub const DEFAULT_TIME_STEP: f64 = 0.03;
/// Default seconds between trees in infinite mode
pub const DEFAULT_TIME_WAIT: f64 = 4.0;
/// Default leaf list
pub const DEFAULT_LEAVES: &str = "&";
/// Leaf motifs used with the roots base when no leaves were given
pub const ROOTS_LEAVES: &str = ".,.:,::,-,--,*";

/// Configuration for one bonsai session
#[derive(Clone, Debug)]
pub struct BonsaiConfig {
    pub live: bool,
    pub infinite: bool,
    pub screensaver: bool,
    pub print: bool,
    pub mono: bool,
    pub verbosity: u8,
    pub time_step: f64,
    pub time_wait: f64,
    pub life_start: u32,
    pub multiplier: u32,
    pub base: BaseArt,
    pub leaves: Vec<String>,
    pub message: Option<String>,
    /// 0 means "derive from the wall clock"
    pub seed: u64,
    pub save: Option<PathBuf>,
    pub load: Option<PathBuf>,
}

impl Default for BonsaiConfig {
    fn default() -> Self {
        Self {
            live: false,
            infinite: false,
            screensaver: false,
            print: false,
            mono: false,
            verbosity: 0,
            time_step: DEFAULT_TIME_STEP,
            time_wait: DEFAULT_TIME_WAIT,
            life_start: DEFAULT_LIFE,
            multiplier: DEFAULT_MULTIPLIER,
            base: BaseArt::LargePot,
            leaves: parse_leaves(DEFAULT_LEAVES),
            message: None,
            seed: 0,
            save: None,
            load: None,
        }
    }
}

/// Split a comma-delimited leaf list, skipping empty entries
pub fn parse_leaves(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Branch kinds for the bonsai tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Trunk,
    ShootLeft,
    ShootRight,
    Dying,
    Dead,
}

impl BranchKind {
    pub fn is_shoot(self) -> bool {
        matches!(self, BranchKind::ShootLeft | BranchKind::ShootRight)
    }

    /// Short label used by the verbose overlay
    pub fn label(self) -> &'static str {
        match self {
            BranchKind::Trunk => "trunk",
            BranchKind::ShootLeft => "shoot-left",
            BranchKind::ShootRight => "shoot-right",
            BranchKind::Dying => "dying",
            BranchKind::Dead => "dead",
        }
    }
}

/// Static art drawn beneath the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseArt {
    None,
    LargePot,
    SmallPot,
    /// Trunk flare and roots; switches the tree to the organic geometry
    Roots,
}

impl BaseArt {
    /// Unrecognized indices draw nothing
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => BaseArt::LargePot,
            2 => BaseArt::SmallPot,
            3 => BaseArt::Roots,
            _ => BaseArt::None,
        }
    }

    /// Width and height of the base layer
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            BaseArt::None => (0, 0),
            BaseArt::LargePot => (31, 4),
            BaseArt::SmallPot => (15, 3),
            BaseArt::Roots => (35, 4),
        }
    }

    pub fn is_organic(self) -> bool {
        self == BaseArt::Roots
    }
}

/// Counters for tracking generation progress
#[derive(Clone, Debug, Default)]
pub struct Counters {
    pub branches: u32,
    pub shoots: u32,
    pub shoot_counter: u32,
}
