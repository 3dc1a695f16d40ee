use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "swapi-to-sqlite")]
#[command(version, about = "Load the Star Wars API into SQLite and query it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop all tables and reload every resource from the catalog
    Ingest {
        /// SQLite database path
        #[arg(long, env = "SWAPI_DB")]
        db: Option<PathBuf>,

        /// Catalog API base URL
        #[arg(long, env = "SWAPI_BASE_URL")]
        base_url: Option<String>,

        /// Read <resource>.json listings from this directory instead of the API
        #[arg(long)]
        from_dir: Option<PathBuf>,

        /// Log lines instead of the full-screen view
        #[arg(long)]
        plain: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Case-insensitive name/title search across resources
    Search {
        /// Text to look for
        query: String,

        /// SQLite database path
        #[arg(long, env = "SWAPI_DB")]
        db: Option<PathBuf>,

        /// Only search these resource types (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Skip these resource types (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one entity with its related entities
    Show {
        /// Resource type (people, films, planets, species, vehicles, starships)
        resource: String,

        /// Entity id
        id: i64,

        /// SQLite database path
        #[arg(long, env = "SWAPI_DB")]
        db: Option<PathBuf>,

        /// Print the entity as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all tables in creation order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
