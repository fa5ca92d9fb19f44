pub mod apartments;
pub mod camera;
pub mod constants;
pub mod geometry;
pub mod gesture;
pub mod gltf_import;
pub mod rig;
pub mod scene;
pub mod shell;
pub mod tween;

pub use apartments::*;
pub use camera::*;
pub use geometry::*;
pub use gesture::*;
pub use gltf_import::*;
pub use rig::*;
pub use scene::*;
pub use shell::*;
pub use tween::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");

// Apartment table bundled at build time
pub static APARTMENTS_JSON: &str = include_str!("../../data/apartments.json");
