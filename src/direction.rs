//! Movement model for a single growth step.
//!
//! Every function here draws from the caller's RNG and holds no state of its
//! own, so a seeded generator replays the same tree.

use crate::config::{BaseArt, BranchKind};
use rand::Rng;

/// Compute the (dx, dy) step for a branch.
///
/// `age` is the number of steps elapsed since the trunk started
/// (`life_start - life`).
pub fn deltas<R: Rng + ?Sized>(
    rng: &mut R,
    kind: BranchKind,
    life: i32,
    age: i32,
    multiplier: i32,
    base: BaseArt,
) -> (i32, i32) {
    match kind {
        BranchKind::Trunk if base.is_organic() => organic_trunk(rng, age),
        BranchKind::Trunk => trunk(rng, life, age, multiplier),
        BranchKind::ShootLeft => shoot(rng, -1),
        BranchKind::ShootRight => shoot(rng, 1),
        BranchKind::Dying => dying(rng),
        BranchKind::Dead => dead(rng),
    }
}

/// Damp downward movement one unit when the branch sits on the last rows
/// of the tree layer.
pub fn clamp_to_floor(dy: i32, y: i32, layer_height: i32) -> i32 {
    if dy > 0 && y > layer_height - 2 {
        dy - 1
    } else {
        dy
    }
}

fn trunk<R: Rng + ?Sized>(rng: &mut R, life: i32, age: i32, multiplier: i32) -> (i32, i32) {
    if age <= 2 || life < 4 {
        // Sapling or nearly spent: spread sideways only
        (rng.gen_range(-1..=1), 0)
    } else if age < multiplier * 3 {
        let period = ((multiplier as f64 * 0.5) as i32).max(1);
        let dy = if age % period == 0 { -1 } else { 0 };
        let dx = match rng.gen_range(0..10) {
            0 => -2,
            1..=3 => -1,
            4..=5 => 0,
            6..=8 => 1,
            _ => 2,
        };
        (dx, dy)
    } else {
        let dy = if rng.gen_range(0..10) > 2 { -1 } else { 0 };
        (rng.gen_range(-1..=1), dy)
    }
}

fn organic_trunk<R: Rng + ?Sized>(rng: &mut R, age: i32) -> (i32, i32) {
    let mut dy = if rng.gen_range(0..10) <= 4 { -1 } else { 0 };

    let dx = if age <= 3 {
        dy = -1;
        0
    } else if age <= 10 {
        match rng.gen_range(0..10) {
            0..=2 => -1,
            8..=9 => 1,
            _ => 0,
        }
    } else {
        match rng.gen_range(0..10) {
            0..=3 => -1,
            7..=9 => 1,
            _ => 0,
        }
    };

    (dx, dy)
}

/// `side` is -1 for a left shoot, 1 for a right shoot.
fn shoot<R: Rng + ?Sized>(rng: &mut R, side: i32) -> (i32, i32) {
    let dy = match rng.gen_range(0..10) {
        0 => -1,
        1..=6 => 0,
        _ => 1,
    };

    let dx = match rng.gen_range(0..10) {
        0..=1 => 2,
        2..=5 => 1,
        6..=8 => 0,
        _ => -1,
    };

    (dx * side, dy)
}

fn dying<R: Rng + ?Sized>(rng: &mut R) -> (i32, i32) {
    let dy = match rng.gen_range(0..10) {
        0 => -1,
        1..=8 => 0,
        _ => 1,
    };

    let dx = match rng.gen_range(0..15) {
        0 => -3,
        1..=2 => -2,
        3..=5 => -1,
        6..=8 => 0,
        9..=11 => 1,
        12..=13 => 2,
        _ => 3,
    };

    (dx, dy)
}

fn dead<R: Rng + ?Sized>(rng: &mut R) -> (i32, i32) {
    let dy = match rng.gen_range(0..10) {
        0..=2 => -1,
        3..=6 => 0,
        _ => 1,
    };
    (rng.gen_range(-1..=1), dy)
}
