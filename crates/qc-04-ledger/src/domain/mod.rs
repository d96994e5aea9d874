pub mod batch;
pub mod entities;
pub mod errors;
pub mod spending;
pub mod world_state;

pub use batch::*;
pub use entities::*;
pub use errors::*;
pub use spending::*;
pub use world_state::*;
