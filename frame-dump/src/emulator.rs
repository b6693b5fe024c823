use crossbeam_channel::Receiver;
use dmg_core::dmg::{Dmg, VideoConfig};
use dmg_core::memory::mmio::Mmio;
use dmg_core::memory::registers::Interrupt;
use dmg_core::video::error::cycles_from;
use dmg_core::video::{CYCLES_PER_FRAME, Frame};
use log::*;
use std::error::Error;
use std::fs::File;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Frames worth of cycles to run without a presented frame before giving up.
const BAIL_AFTER_FRAMES: u64 = 8;

/// How many cycles each call into the LCD controller advances.
pub enum Cadence {
    Fixed(u32),
    Trace { counts: Vec<u32>, cursor: usize },
}

impl Cadence {
    /// Parses a cycle trace: one signed count per line, blank lines and `#` comments skipped.
    pub fn from_trace(text: &str) -> Result<Cadence, Box<dyn Error>> {
        let mut counts = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let count: i64 = line
                .parse()
                .map_err(|e| format!("cycle trace line {}: {}", number + 1, e))?;
            counts.push(cycles_from(count)?);
        }

        if counts.iter().all(|&count| count == 0) {
            return Err("cycle trace never advances the clock".into());
        }

        Ok(Cadence::Trace { counts, cursor: 0 })
    }

    fn next(&mut self) -> u32 {
        match self {
            Cadence::Fixed(cycles) => *cycles,
            Cadence::Trace { counts, cursor } => {
                let cycles = counts[*cursor];
                *cursor = (*cursor + 1) % counts.len();
                cycles
            }
        }
    }
}

pub struct Emulator {
    pub dmg: Dmg,
    frames: Receiver<Frame>,
    cadence: Cadence,
    stat_interrupts: u64,
}

impl Emulator {
    pub fn new(snapshot_path: &str, config: VideoConfig, cadence: Cadence) -> Result<Self, Box<dyn Error>> {
        let mut data = Vec::new();
        File::open(snapshot_path)
            .map_err(|e| format!("failed to open snapshot {}: {}", snapshot_path, e))?
            .read_to_end(&mut data)?;

        if snapshot_path.ends_with(".zip") {
            data = Self::unzip_archive(&data)?;
        }

        info!("Snapshot: {} ({} bytes)", snapshot_path, data.len());

        let mut dmg = Dmg::with_bus(Mmio::new(), config);
        dmg.load(0x0000, &data);
        dmg.power_on();
        dmg.restore_registers()?;
        let frames = dmg.subscribe();

        Ok(Self {
            dmg,
            frames,
            cadence,
            stat_interrupts: 0,
        })
    }

    /// Steps until the next frame is presented. `None` when the display stays off.
    pub fn run_to_frame(&mut self) -> Option<Frame> {
        let budget = CYCLES_PER_FRAME as u64 * BAIL_AFTER_FRAMES;
        let mut elapsed = 0u64;

        while elapsed < budget {
            let cycles = self.cadence.next();
            self.dmg.step(cycles);
            elapsed += cycles as u64;

            self.service_interrupts();

            if let Ok(frame) = self.frames.try_recv() {
                return Some(frame);
            }
        }

        warn!("No frame presented after {} cycles, is the display enabled?", elapsed);
        None
    }

    pub fn stat_interrupts(&self) -> u64 {
        self.stat_interrupts
    }

    // stands in for the CPU: every pending line is taken immediately
    fn service_interrupts(&mut self) {
        let taken = self.dmg.interrupts.acknowledge(Interrupt::VBLANK | Interrupt::LCD_STAT);
        if taken.contains(Interrupt::LCD_STAT) {
            self.stat_interrupts += 1;
        }

        for line in taken.iter() {
            if let Some(vector) = line.vector() {
                trace!("Serviced {} via {:04x} at ly={}", line, vector, self.dmg.lcd.ly());
            }
        }
    }

    fn unzip_archive(buffer: &[u8]) -> Result<Vec<u8>, Box<dyn Error>> {
        let mut archive = ZipArchive::new(Cursor::new(buffer))?;

        let index = (0..archive.len())
            .find(|&i| archive.by_index(i).map(|file| file.is_file()).unwrap_or(false))
            .ok_or("no snapshot found in archive")?;

        let mut file = archive.by_index(index)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;

        Ok(data)
    }
}
