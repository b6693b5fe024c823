use super::registers::Interrupt;
use log::*;
use std::cell::Cell;
use std::rc::Rc;

/// The IF latch shared by every component that raises interrupts.
///
/// Only the owner (the interrupt dispatcher) can read and clear pending lines. Hardware
/// blocks get an [`InterruptRequester`] which can only ever set bits.
#[derive(Default)]
pub struct InterruptLatch {
    flags: Rc<Cell<Interrupt>>,
}

impl InterruptLatch {
    pub fn new() -> Self {
        InterruptLatch::default()
    }

    pub fn requester(&self) -> InterruptRequester {
        InterruptRequester {
            flags: Rc::clone(&self.flags),
        }
    }

    pub fn pending(&self) -> Interrupt {
        self.flags.get()
    }

    pub fn is_pending(&self, irq: Interrupt) -> bool {
        self.flags.get().contains(irq)
    }

    /// Clears the given lines, returning the ones that were actually pending.
    pub fn acknowledge(&self, irq: Interrupt) -> Interrupt {
        let pending = self.flags.get();
        self.flags.set(pending - irq);
        pending & irq
    }

    pub fn clear(&self) {
        self.flags.set(Interrupt::empty());
    }

    pub fn read(&self) -> u8 {
        // upper three bits are unconnected and read high
        self.flags.get().bits() | 0b1110_0000
    }

    pub fn write(&self, value: u8) {
        self.flags.set(Interrupt::from_bits_truncate(value));
    }
}

/// Set-only handle onto an [`InterruptLatch`].
#[derive(Clone)]
pub struct InterruptRequester {
    flags: Rc<Cell<Interrupt>>,
}

impl InterruptRequester {
    pub fn request(&self, irq: Interrupt) {
        trace!(target: "irq", "{} requested", irq);
        self.flags.set(self.flags.get() | irq);
    }
}
