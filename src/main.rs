use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use decision_table::{api, config::AppConfig, db, editor::Editor, export, render};

#[derive(Parser)]
#[command(name = "dtab")]
#[command(about = "Decision tables from enumerated columns")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the decision table API
    Serve {
        /// Port for HTTP API (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the table
    Show {
        /// Ignore filters and print every row
        #[arg(short, long)]
        all: bool,
    },
    /// Write the table as CSV
    Export {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Reset the table to its defaults
    Reset {
        /// Only clear when/then annotations
        #[arg(long, conflicts_with = "filters")]
        rows: bool,
        /// Only clear filters
        #[arg(long)]
        filters: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "decision_table=debug,dtab=debug,tower_http=debug".into()),
    );

    // Logs go to stderr so `show` and `export` output stays clean on stdout.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(config: &AppConfig) -> anyhow::Result<db::Database> {
    let db = match &config.db_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: &AppConfig, port: u16) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let app = api::create_router_with_cors(db, config.cors_origins.clone());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Decision table API listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load();

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(&config, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Show { all }) => {
            let db = open_database(&config)?;
            let mut editor = Editor::load(&db)?;
            if all {
                editor.reset_filters();
            }
            print!("{}", render::render_table(&editor.view()));
        }
        Some(Commands::Export { out }) => {
            let db = open_database(&config)?;
            let editor = Editor::load(&db)?;
            editor.export(&export::DirectorySink::new(out))?;
        }
        Some(Commands::Reset { rows, filters }) => {
            let db = open_database(&config)?;
            let mut editor = Editor::load(&db)?;
            if rows {
                editor.reset_rows();
            } else if filters {
                editor.reset_filters();
            } else {
                editor.reset_all();
            }
            editor.save(&db)?;
            tracing::info!("Reset complete");
        }
        None => {
            serve(&config, config.port).await?;
        }
    }

    Ok(())
}
