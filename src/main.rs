use env_logger::Env;
use log::error;
use mcrouter_sidecar::cli::{self, Profile};
use mcrouter_sidecar::shutdown;
use mcrouter_sidecar::sidecar::Sidecar;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Arc::new(cli::config_or_exit(Profile::ChangeDetecting));
    let sidecar = Sidecar::new(config);

    // No retries here, the supervisor restarts us
    if let Err(e) = sidecar.run(shutdown::listen()).await {
        error!("{}", e);
        process::exit(1);
    }
}
