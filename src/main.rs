use std::path::PathBuf;
use std::process;
use std::sync::Arc;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod state;

fn main() {
    let cli = cli::Cli::parse_or_exit();

    let cfg = match config::Config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            logger::log_fatal(&format!("Option parsing failed: {e}"));
            process::exit(1);
        }
    };

    // Resolve the served directory once; every request joins against it
    // and the working directory is never touched again.
    let root = match std::fs::canonicalize(&cfg.server.directory) {
        Ok(root) => root,
        Err(e) => {
            logger::log_fatal(&format!(
                "Failed to access directory `{}': {e}",
                cfg.server.directory
            ));
            process::exit(1);
        }
    };

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_fatal(&format!("Failed to start runtime: {e}"));
            process::exit(1);
        }
    };

    runtime.block_on(async_main(cfg, root));
}

async fn async_main(cfg: config::Config, root: PathBuf) {
    let port = cfg.server.port;

    let listener = match server::create_dual_stack_listener(port) {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_fatal(&format!("Failed to start http server on port {port}: {e}"));
            process::exit(1);
        }
    };

    let state = Arc::new(state::AppState::new(cfg, root));

    let signal_handler = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signal_handler));

    match listener.local_addr() {
        Ok(addr) => logger::log_server_start(&addr, &state.root, &state.config),
        Err(e) => logger::log_warning(&format!("Could not read local address: {e}")),
    }

    server::start_server_loop(listener, state, Arc::clone(&signal_handler.shutdown)).await;
}
