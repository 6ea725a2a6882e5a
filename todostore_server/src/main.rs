use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use todostore::{DEFAULT_DATABASE_URL, SQLITE_BACKEND, StoreConfig, TodoService};

#[derive(Parser, Debug)]
#[command(name = "todostore-server", about = "JSON API for the todostore todo list")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000", env = "TODOSTORE_BIND")]
    bind: SocketAddr,

    /// Connection URL for the backing store
    #[arg(long, default_value = DEFAULT_DATABASE_URL, env = "TODOSTORE_DB")]
    database_url: String,

    /// Store backend tag
    #[arg(long, default_value = SQLITE_BACKEND, env = "TODOSTORE_BACKEND")]
    backend: String,

    /// Log every SQL statement
    #[arg(long, env = "TODOSTORE_SQL_LOG")]
    sql_log: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let service = Arc::new(TodoService::new(StoreConfig {
        backend: args.backend,
        database_url: args.database_url,
        verbose: args.sql_log,
    }));
    // Fail fast: an unopenable store or unknown backend should stop the
    // process here, not surface as 500s later.
    service.initialize().await?;

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    log::info!("todostore server listening on {}", listener.local_addr()?);
    axum::serve(listener, todostore_server::app(service)).await?;
    Ok(())
}
