use super::CYCLES_PER_LINE;
use bitflags::bitflags;

bitflags! {
    #[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
    pub struct LcdStat: u8 {
        const MODE              = 0b0000_0011;
        const COINCIDENCE_FLAG  = 1 << 2;
        const HBLANK_IRQ_ENABLE = 1 << 3;
        const VBLANK_IRQ_ENABLE = 1 << 4;
        const OAM_IRQ_ENABLE    = 1 << 5;
        const LYC_IRQ_ENABLE    = 1 << 6;
        const WRITABLE          = 0b0111_1000;
    }

    #[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
    pub struct LcdControl: u8 {
        const BG_ENABLE         = 1 << 0;
        const OBJ_ENABLE        = 1 << 1;
        const OBJ_SIZE          = 1 << 2;
        const BG_TILE_MAP       = 1 << 3;
        const TILE_DATA_SELECT  = 1 << 4;
        const WINDOW_ENABLE     = 1 << 5;
        const WINDOW_TILE_MAP   = 1 << 6;
        const DISPLAY_ENABLE    = 1 << 7;
    }
}

bitflags! {
    /// Compatibility switches for timing behaviour that differs from the documented hardware.
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct Quirks: u8 {
        /// Entering OAM scan also honours the V-Blank STAT enable, and entering V-Blank tests
        /// the OAM enable bit. Software tuned against the reference timing relies on this.
        const STAT_MODE2_FALLTHROUGH = 1 << 0;
        /// STAT writes can only set interrupt enables, never clear them.
        const STICKY_STAT_WRITES     = 1 << 1;
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::STAT_MODE2_FALLTHROUGH
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LcdMode {
    HBlank,
    VBlank,
    OamScan,
    Transfer,
}

impl LcdMode {
    pub fn from_bits(bits: u8) -> LcdMode {
        match bits & LcdStat::MODE.bits() {
            0 => LcdMode::HBlank,
            1 => LcdMode::VBlank,
            2 => LcdMode::OamScan,
            3 => LcdMode::Transfer,
            _ => unreachable!(),
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            LcdMode::HBlank => 0,
            LcdMode::VBlank => 1,
            LcdMode::OamScan => 2,
            LcdMode::Transfer => 3,
        }
    }

    /// Cycles the controller stays in this mode before the next transition.
    pub fn duration(&self) -> u32 {
        match self {
            LcdMode::OamScan => 80,
            LcdMode::Transfer => 172,
            LcdMode::HBlank => 204,
            LcdMode::VBlank => CYCLES_PER_LINE,
        }
    }
}

impl std::fmt::Display for LcdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LcdMode::HBlank => write!(f, "H-Blank"),
            LcdMode::VBlank => write!(f, "V-Blank"),
            LcdMode::OamScan => write!(f, "OAM Scan"),
            LcdMode::Transfer => write!(f, "Pixel Transfer"),
        }
    }
}

impl LcdStat {
    pub fn mode(&self) -> LcdMode {
        LcdMode::from_bits(self.bits())
    }

    pub fn set_mode(&mut self, mode: LcdMode) {
        *self = LcdStat::from_bits_retain((self.bits() & !LcdStat::MODE.bits()) | mode.bits());
    }

    pub fn coincidence(&self) -> bool {
        self.contains(LcdStat::COINCIDENCE_FLAG)
    }
}

impl LcdControl {
    pub fn display_enabled(&self) -> bool {
        self.contains(LcdControl::DISPLAY_ENABLE)
    }
}
