pub mod ingest;
pub mod schema_gen;
pub mod sqlite;

pub use ingest::*;
pub use sqlite::*;
