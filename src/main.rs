//! Bookshelf CLI - serve the book catalogue over HTTP

use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use bookshelf::config::{self, Backend, BookshelfConfig};
use bookshelf::storage;
use bookshelf::BookService;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(version)]
#[command(about = "Book catalogue REST service backed by SQLite")]
#[command(long_about = r#"
Bookshelf serves a small book catalogue over HTTP:
  GET    /books         list all books
  GET    /books/{id}    fetch one book
  POST   /books         add a book, responds with the new id
  PUT    /books/{id}    replace a book
  DELETE /books/{id}    remove a book

Example usage:
  bookshelf init
  bookshelf serve --port 8080 --database ./data/books.db
  bookshelf serve --memory
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the config file (defaults to ./bookshelf.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Maximum number of pooled database connections
        #[arg(long)]
        pool_size: Option<u32>,

        /// Keep books in memory instead of a database file
        #[arg(long)]
        memory: bool,
    },

    /// Write a default config file
    Init {
        /// Where to write the config file
        #[arg(long, default_value = "bookshelf.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config, host, port, database, pool_size, memory } => {
            let mut settings = config::load_config(config.as_deref())?.unwrap_or_default();
            if let Some(host) = host {
                settings.server.host = host.to_string();
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(database) = database {
                settings.database.path = database;
            }
            if let Some(pool_size) = pool_size {
                settings.database.pool_size = pool_size;
            }
            if memory {
                settings.database.backend = Backend::Memory;
            }
            settings.validate()?;
            let addr = settings.socket_addr()?;

            let store = storage::open_store(&settings.database)?;
            bookshelf::server::start_server(addr, BookService::new(store)).await?;
        }

        Commands::Init { path, force } => {
            config::write_config(&path, &BookshelfConfig::default(), force)?;
            println!("✅ Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
