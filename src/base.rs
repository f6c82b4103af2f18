use crate::canvas::Layer;
use crate::colors::{Attr, GRAY, LEAF_DARK, WOOD_DARK, WOOD_LIGHT};
use crate::config::BaseArt;

/// One run of base art: row, column, text, attribute
type Run = (i32, i32, &'static str, Attr);

/// Draw the static art for a base variant into its layer
pub fn draw(layer: &mut Layer, base: BaseArt) {
    for &(row, col, text, attr) in runs(base) {
        layer.set_str(col, row, text, attr);
    }
}

fn runs(base: BaseArt) -> &'static [Run] {
    const POT_RIM: Attr = Attr::new(GRAY, true);
    const MOSS: Attr = Attr::new(LEAF_DARK, true);
    const ROOT_BALL: Attr = Attr::new(WOOD_LIGHT, true);

    const LARGE_POT: &[Run] = &[
        (0, 0, ":", POT_RIM),
        (0, 1, "___________", MOSS),
        (0, 12, "./~~~\\.", ROOT_BALL),
        (0, 19, "___________", MOSS),
        (0, 30, ":", POT_RIM),
        (1, 0, " \\                           / ", POT_RIM),
        (2, 0, "  \\_________________________/ ", POT_RIM),
        (3, 0, "  (_)                     (_)", POT_RIM),
    ];

    const SMALL_POT: &[Run] = &[
        (0, 0, "(", Attr::new(GRAY, false)),
        (0, 1, "---", Attr::new(LEAF_DARK, false)),
        (0, 4, "./~~~\\.", Attr::new(WOOD_LIGHT, false)),
        (0, 11, "---", Attr::new(LEAF_DARK, false)),
        (0, 14, ")", Attr::new(GRAY, false)),
        (1, 0, " (           ) ", Attr::new(GRAY, false)),
        (2, 0, "  (_________)  ", Attr::new(GRAY, false)),
    ];

    const ROOTS: &[Run] = &[
        (0, 16, "###", Attr::new(WOOD_DARK, false)),
        (1, 15, "#####", Attr::new(WOOD_DARK, false)),
        (2, 14, "*", Attr::new(GRAY, false)),
        (2, 15, "#####", Attr::new(WOOD_DARK, false)),
        (2, 20, "*", Attr::new(GRAY, false)),
        (3, 0, ".::--==++", Attr::new(GRAY, false)),
        (3, 9, "****#########****", Attr::new(WOOD_DARK, false)),
        (3, 26, "++==--::.", Attr::new(GRAY, false)),
    ];

    match base {
        BaseArt::None => &[],
        BaseArt::LargePot => LARGE_POT,
        BaseArt::SmallPot => SMALL_POT,
        BaseArt::Roots => ROOTS,
    }
}
