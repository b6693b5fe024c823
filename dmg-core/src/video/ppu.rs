use super::registers::LcdControl;
use super::tile::{Monochrome, PaletteResolver, TileRow};
use super::{
    BG_MAP_ADDR, BG_MAP_WIDTH, BGP_ADDR, Frame, LCDC_ADDR, SCREEN_HEIGHT, SCREEN_WIDTH, SCY_ADDR, Shade, TILES_PER_LINE,
};
use crate::memory::device::Addressable;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::*;

/// One frame slot shared with a consumer. The renderer keeps its own receiver so an unread
/// frame can be taken back and replaced by a newer one.
struct Subscriber {
    tx: Sender<Frame>,
    stale: Receiver<Frame>,
}

impl Subscriber {
    fn publish(&self, frame: Frame) {
        if let Err(TrySendError::Full(frame)) = self.tx.try_send(frame) {
            if self.stale.try_recv().is_ok() {
                trace!(target: "ppu", "Replacing unread frame");
            }
            // the consumer may have emptied the slot in between, either way it is free now
            self.tx.try_send(frame).ok();
        }
    }
}

/// Background renderer. Builds the frame one scanline at a time as the LCD controller
/// leaves pixel transfer, and hands out finished frames on V-Blank.
pub struct Ppu {
    buffer: Box<Frame>,
    palette: Box<dyn PaletteResolver>,
    subscribers: Vec<Subscriber>,
    frames_emitted: u64,
}

impl Ppu {
    pub fn new() -> Ppu {
        Ppu::with_palette(Box::new(Monochrome))
    }

    pub fn with_palette(palette: Box<dyn PaletteResolver>) -> Ppu {
        Ppu {
            buffer: Box::new([[Shade::White; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            palette,
            subscribers: Vec::new(),
            frames_emitted: 0,
        }
    }

    pub fn init(&mut self) {
        self.clear();
        self.frames_emitted = 0;
    }

    /// Registers a frame consumer. Each subscriber holds at most one undelivered frame;
    /// a newer frame overwrites one that has not been read yet.
    pub fn subscribe(&mut self) -> Receiver<Frame> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.subscribers.push(Subscriber {
            tx,
            stale: rx.clone(),
        });
        rx
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    pub fn buffer(&self) -> &Frame {
        &self.buffer
    }

    pub fn decode_scanline<B>(&mut self, bus: &B, line: u8)
    where
        B: Addressable + ?Sized,
    {
        let y = line as usize;
        if y >= SCREEN_HEIGHT {
            return;
        }

        if y == 0 {
            self.clear();
        }

        let scroll_y = bus.read(SCY_ADDR);
        let bgp = bus.read(BGP_ADDR);
        let row = line.wrapping_add(scroll_y);
        let map_addr = BG_MAP_ADDR + (row as u16 / 8) * BG_MAP_WIDTH;

        trace!(target: "ppu", "Decoding line {} (bg row {}, map {:04x})", line, row, map_addr);

        for slot in 0..TILES_PER_LINE {
            let tile = bus.read(map_addr + slot as u16);
            let tile_row = TileRow::fetch(bus, tile, row % 8);

            for (column, color_id) in tile_row.color_ids().into_iter().enumerate() {
                let x = slot * 8 + column;
                let shade = self.palette.resolve(color_id, bgp);

                #[cfg(feature = "verbose_debug")]
                if shade.is_dark() {
                    trace!(target: "ppu", "Drawing at {}, {}", x, y);
                }

                self.buffer[y][x] = shade;
            }
        }
    }

    pub fn complete_frame<B>(&mut self, bus: &B)
    where
        B: Addressable + ?Sized,
    {
        let control = LcdControl::from_bits_retain(bus.read(LCDC_ADDR));
        if !control.display_enabled() {
            debug!(target: "ppu", "Display disabled, frame not presented");
            return;
        }

        let frame: Frame = *self.buffer;
        for subscriber in &self.subscribers {
            subscriber.publish(frame);
        }

        self.frames_emitted += 1;
        debug!(target: "ppu", "Frame {} presented", self.frames_emitted);
    }

    fn clear(&mut self) {
        for row in self.buffer.iter_mut() {
            row.fill(Shade::White);
        }
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Ppu::new()
    }
}
