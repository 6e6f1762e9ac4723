pub mod node;
pub mod path;
pub mod scalar;

pub use node::*;
pub use scalar::*;
