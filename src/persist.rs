//! Save file holding the seed and branch count of the last tree.
//!
//! The format is two whitespace-separated integers: `<seed> <branches>`.

use crate::error::PersistError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name used under the cache directory
const CACHE_FILE: &str = "termbonsai";

/// Seed and size of a previously grown tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavedTree {
    pub seed: u64,
    pub branches: u32,
}

/// Default save/load location: the user cache directory, then `~/.cache`,
/// then the working directory.
pub fn default_path() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .map(|dir| dir.join(CACHE_FILE))
        .unwrap_or_else(|| PathBuf::from(CACHE_FILE))
}

pub fn save(path: &Path, tree: SavedTree) -> Result<(), PersistError> {
    fs::write(path, format!("{} {}", tree.seed, tree.branches)).map_err(|source| PersistError::Io {
        action: "writing",
        path: path.to_path_buf(),
        source,
    })
}

/// Read a save file. Trailing content after the two integers is ignored.
pub fn load(path: &Path) -> Result<SavedTree, PersistError> {
    let content = fs::read_to_string(path).map_err(|source| PersistError::Io {
        action: "reading",
        path: path.to_path_buf(),
        source,
    })?;

    parse(&content).ok_or_else(|| PersistError::Malformed {
        path: path.to_path_buf(),
    })
}

fn parse(content: &str) -> Option<SavedTree> {
    let mut fields = content.split_whitespace();
    let seed = fields.next()?.parse().ok()?;
    let branches = fields.next()?.parse().ok()?;
    Some(SavedTree { seed, branches })
}
