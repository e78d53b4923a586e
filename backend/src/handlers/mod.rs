//! HTTP handlers for the Garment Workshop API

mod calculate;
mod clothes;
mod clothes_material;
mod health;
mod material;
mod storage;

pub use calculate::*;
pub use clothes::*;
pub use clothes_material::*;
pub use health::*;
pub use material::*;
pub use storage::*;
