pub mod clock;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod layers;
pub mod orbit;
pub mod sampler;
pub mod scene;
pub mod stats;
pub mod tween;
pub mod uniforms;

pub use clock::*;
pub use command::*;
pub use error::*;
pub use frame::*;
pub use layers::*;
pub use orbit::*;
pub use sampler::*;
pub use scene::*;
pub use stats::*;
pub use tween::*;
pub use uniforms::*;
