use crate::memory::device::Addressable;
use crate::memory::interrupt::InterruptLatch;
use crate::memory::mmio::Mmio;
use crate::memory::registers::IF_ADDR;
use crate::video::error::VideoError;
use crate::video::lcd::Lcd;
use crate::video::ppu::Ppu;
use crate::video::registers::Quirks;
use crate::video::tile::{Monochrome, PaletteResolver};
use crate::video::{Frame, LY_ADDR, LYC_ADDR, STAT_ADDR};
use crossbeam_channel::Receiver;
use log::{debug, info};

pub struct VideoConfig {
    pub quirks: Quirks,
    pub palette: Box<dyn PaletteResolver>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            quirks: Quirks::default(),
            palette: Box::new(Monochrome),
        }
    }
}

/// Video side of the handheld: bus, LCD controller, renderer and the IF latch they share.
pub struct Dmg<B: Addressable = Mmio> {
    pub mmio: B,
    pub lcd: Lcd,
    pub ppu: Ppu,
    pub interrupts: InterruptLatch,
}

impl Dmg<Mmio> {
    pub fn new() -> Self {
        Dmg::with_bus(Mmio::new(), VideoConfig::default())
    }
}

impl Default for Dmg<Mmio> {
    fn default() -> Self {
        Dmg::new()
    }
}

impl<B: Addressable> Dmg<B> {
    pub fn with_bus(mmio: B, config: VideoConfig) -> Self {
        let interrupts = InterruptLatch::new();
        let lcd = Lcd::new(interrupts.requester(), config.quirks);
        info!("Quirks: {:?}", config.quirks);

        Dmg {
            mmio,
            lcd,
            ppu: Ppu::with_palette(config.palette),
            interrupts,
        }
    }

    pub fn power_on(&mut self) {
        self.lcd.init();
        self.ppu.init();
        self.interrupts.clear();
        info!("Power on");
    }

    /// Seeds STAT enables, LYC and IF from the bytes a loaded image left on the bus.
    /// LY is not restored since the counter always restarts at line 0.
    pub fn restore_registers(&mut self) -> Result<(), VideoError> {
        for addr in [STAT_ADDR, LYC_ADDR, IF_ADDR] {
            let value = self.mmio.read(addr);
            self.write(addr, value)?;
        }

        debug!("Restored stat={:02x} lyc={:02x} if={}", self.lcd.stat().bits(), self.lcd.lyc(), self.interrupts.pending());
        Ok(())
    }

    pub fn step(&mut self, cycles: u32) {
        self.lcd.step(cycles, &mut self.ppu, &self.mmio);
    }

    pub fn subscribe(&mut self) -> Receiver<Frame> {
        self.ppu.subscribe()
    }

    pub fn read(&self, addr: u16) -> Result<u8, VideoError> {
        match addr {
            STAT_ADDR | LY_ADDR | LYC_ADDR => self.lcd.read(addr),
            IF_ADDR => Ok(self.interrupts.read()),
            _ => Ok(self.mmio.read(addr)),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), VideoError> {
        match addr {
            STAT_ADDR | LY_ADDR | LYC_ADDR => self.lcd.write(addr, value)?,
            IF_ADDR => self.interrupts.write(value),
            _ => self.mmio.write(addr, value),
        }

        Ok(())
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        self.mmio.load(addr, data);
    }
}
