use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VideoError {
    #[error("LCD register {0:#06x} is not mapped")]
    UnmappedRegister(u16),
    #[error("Cycle count {0} cannot be fed to the LCD controller")]
    CycleCountOutOfRange(i64),
}

/// Converts an externally supplied cycle count into the unsigned count `Lcd::step` takes.
pub fn cycles_from(count: i64) -> Result<u32, VideoError> {
    u32::try_from(count).map_err(|_| VideoError::CycleCountOutOfRange(count))
}
