use bitflags::bitflags;

pub const IF_ADDR: u16 = 0xFF0F;

bitflags! {
    #[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
    pub struct Interrupt: u8 {
        const VBLANK   = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER    = 1 << 2;
        const SERIAL   = 1 << 3;
        const JOYPAD   = 1 << 4;
    }
}

impl Interrupt {
    /// Vector the CPU jumps to when servicing this interrupt.
    pub fn vector(&self) -> Option<u16> {
        match self.bits() {
            0b0000_0001 => Some(0x40),
            0b0000_0010 => Some(0x48),
            0b0000_0100 => Some(0x50),
            0b0000_1000 => Some(0x58),
            0b0001_0000 => Some(0x60),
            _ => None,
        }
    }
}

impl std::fmt::Display for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}
