use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use swapi_to_sqlite::{
    cli::{Cli, Commands},
    config::Settings,
    filter::resolve_resources,
    query::{Catalog, Detail, Relation, SearchResults},
    schema::DependencyResolver,
    source::{CatalogSource, DirSource, HttpSource},
    writer::{ingest_into, IngestSummary},
    LogUi, UiApp,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // The full-screen view owns the terminal; everything else logs to stderr
    if !matches!(cli.command, Commands::Ingest { plain: false, .. }) {
        init_tracing();
    }

    match cli.command {
        Commands::Ingest {
            db,
            base_url,
            from_dir,
            plain,
            json,
        } => {
            let settings = Settings::resolve(db, base_url)?;
            let start = Instant::now();

            let summary = match from_dir {
                Some(dir) => run_ingest(&settings.db_path, &DirSource::new(dir), plain)?,
                None => run_ingest(
                    &settings.db_path,
                    &HttpSource::new(settings.base_url.as_str())?,
                    plain,
                )?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
                println!(
                    "\nLoaded {:?} in {:.1}s",
                    settings.db_path,
                    start.elapsed().as_secs_f64()
                );
            }
        }

        Commands::Search {
            query,
            db,
            include,
            exclude,
            json,
        } => {
            let settings = Settings::resolve(db, None)?;
            let resources = resolve_resources(include, exclude)?;

            let catalog = Catalog::open(&settings.db_path)?;
            let results = catalog.search_in(&query, &resources)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_search(&query, &results);
            }
        }

        Commands::Show {
            resource,
            id,
            db,
            json,
        } => {
            let settings = Settings::resolve(db, None)?;

            let catalog = Catalog::open(&settings.db_path)?;
            let detail = catalog.detail_by_name(&resource, id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&detail);
            }
        }

        Commands::ListTables => {
            let resolver = DependencyResolver::new();
            let tables = resolver.creation_order().map_err(anyhow::Error::msg)?;

            println!("Tables in creation order:\n");
            for table in tables {
                let dependents = resolver.dependents(table.name).map_err(anyhow::Error::msg)?;
                if dependents.is_empty() {
                    println!("  {}", table.name);
                } else {
                    println!("  {:<16} <- {}", table.name, dependents.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn run_ingest(db_path: &Path, source: &impl CatalogSource, plain: bool) -> Result<IngestSummary> {
    if plain {
        return ingest_into(db_path, source, &mut LogUi);
    }

    let mut ui = UiApp::new()?;
    match ingest_into(db_path, source, &mut ui) {
        Ok(summary) => {
            ui.finish(&summary.to_string())?;
            Ok(summary)
        }
        Err(e) => {
            ui.close()?;
            Err(e)
        }
    }
}

fn print_search(query: &str, results: &SearchResults) {
    if results.is_empty() {
        println!("No matches for {:?}", query.trim());
        return;
    }

    for group in &results.groups {
        println!("{} ({})", group.resource, group.hits.len());
        for hit in &group.hits {
            println!("  {:>4}  {}", hit.id, hit.name.as_deref().unwrap_or("-"));
        }
    }
}

fn print_detail(detail: &Detail) {
    println!(
        "{} {}: {}\n",
        detail.resource,
        detail.id,
        detail.display_name().unwrap_or("-")
    );

    for (name, value) in &detail.row.columns {
        println!("  {:<24} {}", name, value);
    }

    for slot in &detail.relations {
        println!();
        match &slot.relation {
            Relation::Single(entity) => match entity {
                Some(e) => println!(
                    "{}: {} ({})",
                    slot.kind.as_str(),
                    e.name.as_deref().unwrap_or("-"),
                    e.id
                ),
                None => println!("{}: -", slot.kind.as_str()),
            },
            Relation::List(entities) => {
                println!("{} ({})", slot.kind.as_str(), entities.len());
                for e in entities {
                    println!("  {:>4}  {}", e.id, e.name.as_deref().unwrap_or("-"));
                }
            }
        }
    }
}
