//! Business logic services for the Garment Workshop backend

pub mod calculate;
pub mod clothes;
pub mod clothes_material;
pub mod material;
pub mod storage;

pub use calculate::CalculateService;
pub use clothes::ClothesService;
pub use clothes_material::ClothesMaterialService;
pub use material::MaterialService;
pub use storage::StorageService;
