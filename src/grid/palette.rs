//! Pad color codes and their on-screen colors

use crate::grid::cell::GridCell;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PadColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Shown for codes outside the table
pub const UNKNOWN: PadColor = PadColor::rgb(0xff, 0xff, 0xff);

const fn c(hex: u32) -> PadColor {
    PadColor::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Screen color for each of the 64 pad codes
pub const PALETTE: [PadColor; 64] = [
    c(0x242424), c(0x7e7e7e), c(0xb2b2b2), c(0xffffff),
    c(0xff7e7e), c(0xff0000), c(0x7e0000), c(0x7e3b3b),
    c(0xffdebd), c(0xff8400), c(0x7e4200), c(0x7e5a3b),
    c(0xffff7e), c(0xffff00), c(0x7e7e00), c(0x7e7e3b),
    c(0xbdff7e), c(0x84ff00), c(0x427e00), c(0x5a7e3b),
    c(0x7eff7e), c(0x00ff00), c(0x007e00), c(0x3b7e3b),
    c(0x7effbd), c(0x00ff84), c(0x007e42), c(0x3b7e5a),
    c(0x7effff), c(0x00ffff), c(0x007e7e), c(0x3b7e7e),
    c(0x7ebdff), c(0x0084ff), c(0x00427e), c(0x3b5a7e),
    c(0x7e7eff), c(0x0000ff), c(0x00007e), c(0x3b3b7e),
    c(0xbd7eff), c(0x8400ff), c(0x42007e), c(0x5a3b7e),
    c(0xff7eff), c(0xff00ff), c(0x7e007e), c(0x7e3b7e),
    c(0xff7ebd), c(0xff0084), c(0x7e0042), c(0x7e3b5a),
    c(0xffbd7e), c(0xff5a00), c(0x7e3b00), c(0x7e5a3b),
    c(0xffbdff), c(0xff00ff), c(0x7e007e), c(0x7e3b7e),
    c(0xff7e42), c(0xbd9e3b), c(0x9e7e3b), c(0x7e7e3b),
];

pub fn color_for(code: u8) -> PadColor {
    PALETTE.get(code as usize).copied().unwrap_or(UNKNOWN)
}

pub fn hex_for(code: u8) -> String {
    color_for(code).to_hex()
}

/// Color a cell shows on screen; inactive cells show code 0
pub fn display_hex(cell: &GridCell) -> String {
    if cell.active {
        hex_for(cell.color())
    } else {
        hex_for(0)
    }
}
