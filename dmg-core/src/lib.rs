pub mod dmg;
pub mod memory;
pub mod video;

#[cfg(test)]
mod tests;
