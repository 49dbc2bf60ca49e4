//! Named color definitions for palette entries

use crate::core::types::Rgb;

/// Background used for any surface area outside the grid
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// CSS color keywords accepted in palettes
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("grey", Rgb::new(0x80, 0x80, 0x80)),
    ("silver", Rgb::new(0xc0, 0xc0, 0xc0)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("gold", Rgb::new(0xff, 0xd7, 0x00)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("teal", Rgb::new(0x00, 0x80, 0x80)),
    ("cyan", Rgb::new(0x00, 0xff, 0xff)),
    ("aqua", Rgb::new(0x00, 0xff, 0xff)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("magenta", Rgb::new(0xff, 0x00, 0xff)),
    ("fuchsia", Rgb::new(0xff, 0x00, 0xff)),
    ("pink", Rgb::new(0xff, 0xc0, 0xcb)),
    ("brown", Rgb::new(0xa5, 0x2a, 0x2a)),
    ("indigo", Rgb::new(0x4b, 0x00, 0x82)),
    ("violet", Rgb::new(0xee, 0x82, 0xee)),
];

/// Resolve a lowercase color keyword or `#rrggbb` literal
pub fn resolve(name: &str) -> Option<Rgb> {
    if name.starts_with('#') {
        return Rgb::from_hex(name);
    }
    NAMED_COLORS
        .iter()
        .find(|(keyword, _)| *keyword == name)
        .map(|(_, rgb)| *rgb)
}
