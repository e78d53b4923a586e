//! Domain models for the Garment Workshop backend

mod bill_of_materials;
mod clothes;
mod material;
mod requirement;
mod storage;

pub use bill_of_materials::*;
pub use clothes::*;
pub use material::*;
pub use requirement::*;
pub use storage::*;
