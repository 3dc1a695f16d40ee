pub mod record;
pub mod reference;

pub use record::*;
pub use reference::*;
