pub mod dependencies;
pub mod resource;
pub mod tables;
pub mod types;

pub use dependencies::*;
pub use resource::*;
pub use tables::*;
pub use types::*;
