pub mod camera;
pub mod config;
pub mod context;
pub mod director;
pub mod globe;
pub mod particles;
pub mod sections;
pub mod snapshot;
pub mod state;

pub use config::*;
pub use context::*;
pub use sections::*;
pub use snapshot::*;
pub use state::*;
