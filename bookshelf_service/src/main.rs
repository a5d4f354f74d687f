//! Reads JSON work items line by line from standard input and writes one
//! JSON response per line to standard output.

use std::sync::Arc;

use bookshelf_api::model::error::ErrorKind;
use bookshelf_common::id::worker::WorkerIdGenerator;
use bookshelf_service::{
    config::AppConfig,
    engine::Bookshelf,
    error::AppResult,
    graph::{executor::Executor, operation::WorkItem, response::Response},
    store::Store,
    telemetry::tracer::Tracer,
};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::Mutex,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = AppConfig::load()?;
    Tracer::install(&config)?;

    info!(
        "Starting {} v{}",
        config.distribution.name,
        config.distribution.version.as_deref().unwrap_or_default(),
    );

    start(&config).await
}

async fn start(config: &AppConfig) -> AppResult<()> {
    let id_generator = Arc::new(Mutex::new(WorkerIdGenerator::new(
        config.node.worker_number,
    )));

    let store = Store::open(&config.database, &id_generator).await?;
    let executor = Executor::new(Bookshelf::new(&store, id_generator));

    let served = serve(&executor).await;
    store.close().await?;
    served
}

async fn serve(executor: &Executor) -> AppResult<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<WorkItem>(line) {
            Ok(item) => executor.respond(&item).await,
            Err(err) => {
                warn!(error = %err, "Malformed work item");
                Response::error(ErrorKind::Validation, format!("malformed work item: {err}"))
            }
        };

        let mut output = serde_json::to_vec(&response)?;
        output.push(b'\n');
        stdout.write_all(&output).await?;
        stdout.flush().await?;
    }

    info!("Input closed");
    Ok(())
}
