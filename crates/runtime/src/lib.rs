pub mod animator;
pub mod frame;

pub use animator::*;
pub use frame::*;
