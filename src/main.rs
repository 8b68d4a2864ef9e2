use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod library;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // A missing videos root is fatal, never a per-request condition
    let videos_root = cfg.resolve_videos_root().map_err(|e| {
        logger::log_error(&e.to_string());
        e
    })?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, videos_root))
}

async fn async_main(
    cfg: config::Config,
    videos_root: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(config::AppState::new(&cfg, videos_root));

    logger::log_server_start(&addr, state.library.root(), &cfg);

    server::run(listener, state).await
}
