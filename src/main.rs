//! arbfinder-train - Main Entry Point
//!
//! Trains the arbitrage opportunity classifiers and exports them for the
//! inference runtime.

use clap::Parser;

use arbfinder_train::cli::{cmd_export, cmd_train, cmd_train_net, cmd_train_tree, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbfinder_train=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::TrainTree { args } => cmd_train_tree(args),
        Commands::TrainNet { args } => cmd_train_net(args),
        Commands::Train { args } => cmd_train(args),
        Commands::Export { args } => cmd_export(args),
    }
}
