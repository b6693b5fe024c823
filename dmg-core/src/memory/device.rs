use bitflags::Flags;

/// Byte-addressed view of the 16-bit bus the video core reads tile data and registers from.
pub trait Addressable {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    fn load(&mut self, addr: u16, data: &[u8]);
}

/// 8-bit memory mapped register backed by a bitflags type.
#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct IoRegister<T>(pub T);

impl<T> IoRegister<T>
where
    T: Flags<Bits = u8> + Copy,
{
    pub fn value(&self) -> T {
        self.0
    }

    pub fn bits(&self) -> u8 {
        self.0.bits()
    }

    pub fn set(&mut self, value: T) {
        self.0 = value;
    }

    pub fn set_flags(&mut self, flags: T) {
        self.0.insert(flags);
    }

    pub fn clear_flags(&mut self, flags: T) {
        self.0.remove(flags);
    }

    pub fn contains_flags(&self, flags: T) -> bool {
        self.0.contains(flags)
    }
}
