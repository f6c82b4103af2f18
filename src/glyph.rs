use crate::config::{BaseArt, BranchKind};
use rand::Rng;
use std::borrow::Cow;
use std::cmp::Ordering;
use unicode_width::UnicodeWidthChar;

/// Drawn when there is nothing to pick from
pub const PLACEHOLDER: &str = "?";

/// Glyph for the current step of a branch.
///
/// Any branch with fewer than 4 life left is drawn as dying, whatever its kind.
#[allow(clippy::too_many_arguments)]
pub fn choose<'a, R: Rng + ?Sized>(
    rng: &mut R,
    kind: BranchKind,
    life: i32,
    age: i32,
    dx: i32,
    dy: i32,
    base: BaseArt,
    leaves: &'a [String],
) -> Cow<'a, str> {
    let kind = if life < 4 { BranchKind::Dying } else { kind };

    if base.is_organic() {
        dense(rng, kind, age, dx, dy, leaves)
    } else {
        sparse(rng, kind, dx, dy, leaves)
    }
}

/// Display width of the glyph's leading character, never less than 1
pub fn display_width(glyph: &str) -> i32 {
    glyph
        .chars()
        .next()
        .and_then(UnicodeWidthChar::width)
        .unwrap_or(1)
        .max(1) as i32
}

fn leaf<'a, R: Rng + ?Sized>(rng: &mut R, leaves: &'a [String]) -> Cow<'a, str> {
    if leaves.is_empty() {
        return Cow::Borrowed(PLACEHOLDER);
    }
    Cow::Borrowed(leaves[rng.gen_range(0..leaves.len())].as_str())
}

fn sparse<'a, R: Rng + ?Sized>(
    rng: &mut R,
    kind: BranchKind,
    dx: i32,
    dy: i32,
    leaves: &'a [String],
) -> Cow<'a, str> {
    use Ordering::*;

    let glyph = match kind {
        BranchKind::Trunk => match (dy.cmp(&0), dx.cmp(&0)) {
            (Equal, _) => "/~",
            (_, Less) => "\\|",
            (_, Equal) => "/|\\",
            (_, Greater) => "|/",
        },
        BranchKind::ShootLeft => match (dy.cmp(&0), dx.cmp(&0)) {
            (Greater, _) => "\\",
            (Equal, _) => "\\_",
            (Less, Less) => "\\|",
            (Less, Equal) => "/|",
            (Less, Greater) => "/",
        },
        BranchKind::ShootRight => match (dy.cmp(&0), dx.cmp(&0)) {
            (Greater, _) => "/",
            (Equal, _) => "_/",
            (Less, Less) => "\\|",
            (Less, Equal) => "/|",
            (Less, Greater) => "/",
        },
        BranchKind::Dying | BranchKind::Dead => return leaf(rng, leaves),
    };

    Cow::Borrowed(glyph)
}

/// Heavier table for the roots base: the trunk tapers with age.
fn dense<'a, R: Rng + ?Sized>(
    rng: &mut R,
    kind: BranchKind,
    age: i32,
    dx: i32,
    dy: i32,
    leaves: &'a [String],
) -> Cow<'a, str> {
    use Ordering::*;

    let glyph = match kind {
        BranchKind::Trunk => {
            let (left, level, right) = match age {
                i32::MIN..=3 => ("%###", "###", "###%"),
                4..=8 => ("%##", "###", "##%"),
                9..=15 => ("%#", "##", "#%"),
                _ => ("%", "#", "%"),
            };
            match dx.cmp(&0) {
                Less => left,
                Equal => level,
                Greater => right,
            }
        }
        BranchKind::ShootLeft => match (dy.cmp(&0), dx.cmp(&0)) {
            (Greater, _) => "%",
            (Equal, _) => "*+",
            (Less, Less) => "%*",
            (Less, Equal) => "*%",
            (Less, Greater) => "+",
        },
        BranchKind::ShootRight => match (dy.cmp(&0), dx.cmp(&0)) {
            (Greater, _) => "%",
            (Equal, _) => "+*",
            (Less, Less) => "*%",
            (Less, Equal) => "%*",
            (Less, Greater) => "+",
        },
        BranchKind::Dying => "-=:.",
        BranchKind::Dead => return leaf(rng, leaves),
    };

    Cow::Borrowed(glyph)
}
