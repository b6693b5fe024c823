use super::{Shade, TILE_DATA_ADDR, TILE_SIZE};
use crate::memory::device::Addressable;

/// One 8 pixel row of a tile, stored as its two bitplanes.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct TileRow {
    pub low: u8,
    pub high: u8,
}

impl TileRow {
    pub fn new(low: u8, high: u8) -> Self {
        TileRow { low, high }
    }

    /// Reads row `row` (0-7) of tile `tile` from tile data at 0x8000.
    pub fn fetch<B>(bus: &B, tile: u8, row: u8) -> Self
    where
        B: Addressable + ?Sized,
    {
        let addr = TILE_DATA_ADDR + tile as u16 * TILE_SIZE + (row as u16 & 7) * 2;
        TileRow::new(bus.read(addr), bus.read(addr + 1))
    }

    /// 2-bit color id of `column`, 0 being the leftmost pixel (bit 7 of each plane).
    pub fn color_id(&self, column: usize) -> u8 {
        let bit = 7 - column;
        (((self.high >> bit) & 1) << 1) | ((self.low >> bit) & 1)
    }

    pub fn color_ids(&self) -> [u8; 8] {
        std::array::from_fn(|column| self.color_id(column))
    }
}

/// Maps a background color id to the shade written into the frame buffer.
pub trait PaletteResolver {
    fn resolve(&self, color_id: u8, bgp: u8) -> Shade;
}

/// Two-level output: a pixel is dark whenever either plane has its bit set. BGP is ignored.
#[derive(Default, Debug, Clone, Copy)]
pub struct Monochrome;

impl PaletteResolver for Monochrome {
    fn resolve(&self, color_id: u8, _bgp: u8) -> Shade {
        if color_id != 0 { Shade::Black } else { Shade::White }
    }
}

/// Four shade lookup through the BGP register.
#[derive(Default, Debug, Clone, Copy)]
pub struct FourShade;

impl PaletteResolver for FourShade {
    fn resolve(&self, color_id: u8, bgp: u8) -> Shade {
        Shade::from_bits(bgp >> ((color_id & 0b11) * 2))
    }
}
