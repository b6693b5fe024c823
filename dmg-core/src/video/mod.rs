pub mod error;
pub mod lcd;
pub mod ppu;
pub mod registers;
pub mod tile;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

pub const LINES_PER_FRAME: usize = 154;
pub const CYCLES_PER_LINE: u32 = 456;
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_LINE * LINES_PER_FRAME as u32;

pub const LCDC_ADDR: u16 = 0xFF40;
pub const STAT_ADDR: u16 = 0xFF41;
pub const SCY_ADDR: u16 = 0xFF42;
pub const SCX_ADDR: u16 = 0xFF43;
pub const LY_ADDR: u16 = 0xFF44;
pub const LYC_ADDR: u16 = 0xFF45;
pub const BGP_ADDR: u16 = 0xFF47;

pub const TILE_DATA_ADDR: u16 = 0x8000;
pub const BG_MAP_ADDR: u16 = 0x9800;
pub const BG_MAP_WIDTH: u16 = 32;
pub const TILE_SIZE: u16 = 16;
pub const TILES_PER_LINE: usize = SCREEN_WIDTH / 8;

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    #[default]
    White = 0,
    LightGray = 1,
    DarkGray = 2,
    Black = 3,
}

impl Shade {
    pub fn from_bits(bits: u8) -> Shade {
        match bits & 0b11 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            3 => Shade::Black,
            _ => unreachable!(),
        }
    }

    pub fn is_dark(&self) -> bool {
        *self != Shade::White
    }

    /// Grayscale value for presentation, white being 255.
    pub fn intensity(&self) -> u8 {
        match self {
            Shade::White => 0xFF,
            Shade::LightGray => 0xAA,
            Shade::DarkGray => 0x55,
            Shade::Black => 0x00,
        }
    }
}

pub type Frame = [[Shade; SCREEN_WIDTH]; SCREEN_HEIGHT];
