pub mod device;
pub mod interrupt;
pub mod mmio;
pub mod registers;
