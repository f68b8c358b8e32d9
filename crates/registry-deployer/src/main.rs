use {clap::Parser, registry_deployer::arguments};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env_file = arguments::env_file_path(std::env::args_os());
    let loaded_env = arguments::load_env_file(&env_file);
    let args = arguments::Arguments::parse();
    observe::tracing::initialize(&args.log_filter, args.log_stderr_threshold);
    match loaded_env {
        Ok(true) => tracing::debug!(path = ?env_file, "loaded environment file"),
        Ok(false) => (),
        Err(err) => tracing::warn!(?err, "ignoring unreadable environment file"),
    }
    tracing::info!("running registry deployer with validated arguments:\n{}", args);

    if let Err(err) = registry_deployer::run(args.into()).await {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
}
