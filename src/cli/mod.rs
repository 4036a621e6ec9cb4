//! Command-line interface for the training pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::*;

use crate::config::PipelineConfig;
use crate::pipeline;
use crate::training::EvalMetrics;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(44).dimmed());
}

fn metric_line(name: &str, value: f64) {
    println!(
        "  {:<12} {}",
        name.dimmed(),
        format!("{value:.4}").white().bold()
    );
}

fn done(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "arbfinder-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Training and export pipeline for the arbfinder opportunity classifiers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every pipeline step
#[derive(Args, Debug, Clone)]
pub struct StepArgs {
    /// Labeled training CSV
    #[arg(short, long, default_value = "data/arbitrage_training_data.csv")]
    pub data: PathBuf,

    /// Artifact directory
    #[arg(short, long, default_value = "models")]
    pub models_dir: PathBuf,

    /// Seed for the train/test split and model initialization
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl StepArgs {
    pub fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::default().with_seed(self.seed);
        config.data_path = self.data;
        config.models_dir = self.models_dir;
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the gradient boosted tree classifier (also fits the scaler)
    TrainTree {
        #[command(flatten)]
        args: StepArgs,
    },

    /// Train the neural classifier (requires the tree trainer's artifacts)
    TrainNet {
        #[command(flatten)]
        args: StepArgs,
    },

    /// Train both models in sequence
    Train {
        #[command(flatten)]
        args: StepArgs,
    },

    /// Export trained models to portable inference formats
    Export {
        #[command(flatten)]
        args: StepArgs,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train_tree(args: StepArgs) -> anyhow::Result<()> {
    let config = args.into_config();

    section("Train tree model");
    let metrics = pipeline::tree::run(&config)?;
    print_metrics(&metrics);

    Ok(())
}

pub fn cmd_train_net(args: StepArgs) -> anyhow::Result<()> {
    let config = args.into_config();

    section("Train neural model");
    let metrics = pipeline::net::run(&config)?;
    print_metrics(&metrics);

    Ok(())
}

pub fn cmd_train(args: StepArgs) -> anyhow::Result<()> {
    let config = args.into_config();

    section("Train tree model");
    let tree_metrics = pipeline::tree::run(&config)?;
    print_metrics(&tree_metrics);

    section("Train neural model");
    let net_metrics = pipeline::net::run(&config)?;
    print_metrics(&net_metrics);

    done("all models trained");
    println!();

    Ok(())
}

pub fn cmd_export(args: StepArgs) -> anyhow::Result<()> {
    let config = args.into_config();

    section("Export");
    pipeline::export::run(&config)?;

    done(&format!(
        "portable artifacts written to {}",
        config.models_dir.display()
    ));
    println!();

    Ok(())
}

fn print_metrics(metrics: &EvalMetrics) {
    println!();
    metric_line("Accuracy", metrics.accuracy);
    metric_line("F1", metrics.f1_score);
    metric_line("AUC", metrics.roc_auc);
    println!();
}
