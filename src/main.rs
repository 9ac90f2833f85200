//! Entry point for the sentiment prediction service.

use std::sync::Arc;

use sentra::config::ServiceConfig;
use sentra::store::ModelStore;
use sentra::{api, logging};

#[tokio::main]
async fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    tracing::info!("Initializing sentiment model...");
    let store = match ModelStore::initialize(&config.model_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!("Model initialization failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Model ready ({:?} from {})",
        store.source(),
        store.artifact_path().display()
    );

    let addr = config.bind_addr();
    tracing::info!("Serving on http://{addr}");
    warp::serve(api::routes(store)).run(addr).await;
}
