pub mod camera;
pub mod constants;
pub mod error;
pub mod foam;
pub mod hit_test;
pub mod input;
pub mod interaction;
pub mod mesh;
pub mod particles;
pub mod sampling;
pub mod scene;

pub use camera::*;
pub use constants::*;
pub use error::{Result, ShowroomError};
pub use foam::*;
pub use hit_test::*;
pub use input::*;
pub use interaction::*;
pub use mesh::*;
pub use particles::*;
pub use sampling::*;
pub use scene::*;

// Shaders bundled as string constants
pub static MESH_WGSL: &str = include_str!("../../shaders/mesh.wgsl");
