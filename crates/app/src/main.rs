// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;
mod version;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Folder, Init, Invite, Item, Version};
use state::{AppConfig, AppState};

command_enum! {
    (Folder, Folder),
    (Init, Init),
    (Invite, Invite),
    (Item, Item),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Log with the configured settings when a state directory exists
    let config = AppState::load(args.config_path.clone())
        .map(|state| state.config)
        .unwrap_or_else(|_| AppConfig::default());
    let guards = logging::init_logging(&config);

    let ctx = op::OpContext::new(args.config_path);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guards);
    std::process::exit(code);
}
