use super::error::VideoError;
use super::ppu::Ppu;
use super::registers::{LcdMode, LcdStat, Quirks};
use super::{LINES_PER_FRAME, LY_ADDR, LYC_ADDR, SCREEN_HEIGHT, STAT_ADDR};
use crate::memory::device::{Addressable, IoRegister};
use crate::memory::interrupt::InterruptRequester;
use crate::memory::registers::Interrupt;
use log::*;

const LAST_LINE: u8 = (LINES_PER_FRAME - 1) as u8;

/// LCD timing controller.
///
/// Walks OAM scan (80) -> pixel transfer (172) -> H-Blank (204) once per visible line and
/// holds V-Blank for lines 144..=153, 456 cycles each. The renderer is driven inline: a
/// line is decoded when pixel transfer ends and the frame is completed on entry to V-Blank.
pub struct Lcd {
    stat: IoRegister<LcdStat>,
    ly: u8,
    lyc: u8,
    cycles: u32,
    quirks: Quirks,
    irq: InterruptRequester,
}

impl Lcd {
    pub fn new(irq: InterruptRequester, quirks: Quirks) -> Lcd {
        let mut lcd = Lcd {
            stat: IoRegister::default(),
            ly: 0,
            lyc: 0,
            cycles: 0,
            quirks,
            irq,
        };
        lcd.init();
        lcd
    }

    pub fn init(&mut self) {
        let mut stat = LcdStat::empty();
        stat.set_mode(LcdMode::OamScan);
        self.stat.set(stat);
        self.ly = 0;
        self.lyc = 0;
        self.cycles = 0;
    }

    pub fn mode(&self) -> LcdMode {
        self.stat.value().mode()
    }

    pub fn stat(&self) -> LcdStat {
        self.stat.value()
    }

    pub fn ly(&self) -> u8 {
        self.ly
    }

    pub fn lyc(&self) -> u8 {
        self.lyc
    }

    /// Cycles accumulated in the current mode.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Advances the controller by `cycles`, performing every transition they cover.
    /// Cycles past a threshold carry over into the next mode.
    pub fn step<B>(&mut self, cycles: u32, ppu: &mut Ppu, bus: &B)
    where
        B: Addressable + ?Sized,
    {
        self.cycles = self.cycles.saturating_add(cycles);

        loop {
            let mode = self.mode();
            let duration = mode.duration();
            if self.cycles < duration {
                break;
            }

            self.cycles -= duration;
            self.advance(mode, ppu, bus);
        }

        self.check_coincidence();
    }

    fn advance<B>(&mut self, mode: LcdMode, ppu: &mut Ppu, bus: &B)
    where
        B: Addressable + ?Sized,
    {
        match mode {
            LcdMode::OamScan => self.enter(LcdMode::Transfer),
            LcdMode::Transfer => {
                self.enter(LcdMode::HBlank);
                ppu.decode_scanline(bus, self.ly);
            }
            LcdMode::HBlank => {
                self.ly += 1;

                if self.ly as usize == SCREEN_HEIGHT {
                    self.enter(LcdMode::VBlank);
                    self.irq.request(Interrupt::VBLANK);
                    ppu.complete_frame(bus);
                } else {
                    self.enter(LcdMode::OamScan);
                }

                self.check_coincidence();
            }
            LcdMode::VBlank => {
                self.ly += 1;

                if self.ly > LAST_LINE {
                    self.ly = 0;
                    self.enter(LcdMode::OamScan);
                }

                self.check_coincidence();
            }
        }
    }

    fn enter(&mut self, mode: LcdMode) {
        let mut stat = self.stat.value();
        stat.set_mode(mode);
        self.stat.set(stat);

        #[cfg(feature = "verbose_debug")]
        trace!(target: "lcd", "mode={}; ly={}", mode, self.ly);

        let fallthrough = self.quirks.contains(Quirks::STAT_MODE2_FALLTHROUGH);
        let raise = match mode {
            LcdMode::HBlank => stat.contains(LcdStat::HBLANK_IRQ_ENABLE),
            LcdMode::Transfer => false,
            LcdMode::OamScan => {
                stat.contains(LcdStat::OAM_IRQ_ENABLE) || (fallthrough && stat.contains(LcdStat::VBLANK_IRQ_ENABLE))
            }
            LcdMode::VBlank if fallthrough => stat.contains(LcdStat::OAM_IRQ_ENABLE),
            LcdMode::VBlank => stat.contains(LcdStat::VBLANK_IRQ_ENABLE),
        };

        if raise {
            self.irq.request(Interrupt::LCD_STAT);
        }
    }

    fn check_coincidence(&mut self) {
        if self.ly == self.lyc {
            self.stat.set_flags(LcdStat::COINCIDENCE_FLAG);
            if self.stat.contains_flags(LcdStat::LYC_IRQ_ENABLE) {
                self.irq.request(Interrupt::LCD_STAT);
            }
        } else {
            self.stat.clear_flags(LcdStat::COINCIDENCE_FLAG);
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8, VideoError> {
        match addr {
            STAT_ADDR => Ok(self.stat.bits()),
            LY_ADDR => Ok(self.ly),
            LYC_ADDR => Ok(self.lyc),
            _ => Err(VideoError::UnmappedRegister(addr)),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), VideoError> {
        match addr {
            STAT_ADDR => {
                let enables = LcdStat::from_bits_truncate(value) & LcdStat::WRITABLE;
                if self.quirks.contains(Quirks::STICKY_STAT_WRITES) {
                    self.stat.set_flags(enables);
                } else {
                    self.stat.set((self.stat.value() - LcdStat::WRITABLE) | enables);
                }
            }
            LY_ADDR => {
                debug!(target: "lcd", "LY written ({:02x}), resetting to 0", value);
                self.ly = 0;
            }
            LYC_ADDR => self.lyc = value,
            _ => return Err(VideoError::UnmappedRegister(addr)),
        }

        Ok(())
    }
}
