/// Defaults computation config module.
pub mod defaults;

mod base;
mod logger;

pub use base::*;
pub use logger::*;
