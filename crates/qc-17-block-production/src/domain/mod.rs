//! Domain layer for block production

pub mod entities;

pub use entities::*;
