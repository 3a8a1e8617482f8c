use std::sync::Arc;

use clap::Parser;
use todo_server::server::shutdown_signal;
use todo_server::config::init_tracing;
use todo_server::{Config, MemoryStore, MongoStore, Server, SharedStore};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), todo_server::Error> {
    let config = Config::parse();
    init_tracing();

    let store: SharedStore = if config.in_memory {
        info!("using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let store = MongoStore::connect(
            &config.mongo_uri,
            &config.database,
            &config.collection,
            config.connect_timeout(),
        )
        .await
        .inspect_err(|e| error!(database = %config.database, "{e}"))?;
        Arc::new(store)
    };

    let server = Server::bind(config.listen_addr()?).await?;
    server.serve(todo_server::app(store), shutdown_signal()).await
}
