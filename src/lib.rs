pub mod config;
pub mod console;
pub mod effects;
pub mod error;
pub mod server;
pub mod skills;

#[cfg(test)]
pub(crate) mod testing;

pub const NAME: &str = "Level-Effects";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
