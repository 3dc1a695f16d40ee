pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod query;
pub mod schema;
pub mod source;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::QueryError;
pub use query::Catalog;
pub use schema::Resource;
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};
pub use writer::{ingest_all, IngestSummary};
