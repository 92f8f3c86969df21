use clap::Parser;
use std::path::PathBuf;
use storyboard_client::cli::dispatcher::Dispatcher;
use storyboard_client::cli::main_types::Cli;
use storyboard_client::display::{ToastCenter, ToastKind};
use storyboard_client::storage::config::Config;
use storyboard_client::utils::logging;

const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Panics are logged and shown as a generic toast instead of a backtrace
    std::panic::set_hook(Box::new(|info| {
        log::error!("Unexpected failure: {}", info);
        ToastCenter::new().show(UNEXPECTED_ERROR, ToastKind::Error);
    }));

    let config_dir = cli.config_dir.as_ref().map(PathBuf::from);
    let config_path = config_dir.as_ref().map(|dir| dir.join("config.toml"));

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            ToastCenter::new().show(format!("Error loading config: {}", err), ToastKind::Error);
            std::process::exit(1);
        }
    };

    let profile_name = config.active_profile_name(cli.profile.as_deref());
    log::debug!("Using profile: {}", profile_name);

    let dispatcher = Dispatcher::new(
        config,
        profile_name,
        cli.base_url,
        config_dir.as_deref(),
        cli.verbose,
    );

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        log::debug!("Command failed: {:?}", e);
        dispatcher.report_error(&e);
        std::process::exit(1);
    }
}
