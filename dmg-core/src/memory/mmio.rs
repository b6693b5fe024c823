use super::device::Addressable;
use log::*;

pub const ADDRESS_SPACE: usize = 0x10000;

/// Flat 64 KiB backing store. Stands in for the cartridge mapper and work RAM so the video
/// core can be driven without a full system around it.
pub struct Mmio {
    memory: Box<[u8]>,
}

impl Mmio {
    pub fn new() -> Mmio {
        Mmio {
            memory: vec![0u8; ADDRESS_SPACE].into_boxed_slice(),
        }
    }
}

impl Default for Mmio {
    fn default() -> Self {
        Mmio::new()
    }
}

impl Addressable for Mmio {
    fn read(&self, addr: u16) -> u8 {
        let value = self.memory[addr as usize];

        #[cfg(feature = "verbose_debug")]
        trace!(target: "mmio", "Read {:02x} from {:04x}", value, addr);

        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        #[cfg(feature = "verbose_debug")]
        trace!(target: "mmio", "Writing {:02x} to {:04x}", value, addr);

        self.memory[addr as usize] = value;
    }

    fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        let room = ADDRESS_SPACE - start;
        if data.len() > room {
            warn!(
                target: "mmio",
                "Image of {} bytes at {:04x} overruns the address space, truncating to {} bytes",
                data.len(),
                addr,
                room
            );
        }

        let len = data.len().min(room);
        self.memory[start..start + len].copy_from_slice(&data[..len]);
    }
}
