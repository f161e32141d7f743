use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use pgschemadiff::cli::commands::compare::{CompareCommand, CompareCommandHandler};
use pgschemadiff::cli::commands::diff::{DiffCommand, DiffCommandHandler};
use pgschemadiff::cli::{Cli, Commands};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run_command(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// ログ出力を初期化する
///
/// RUST_LOGが設定されていればそれを優先し、なければ --verbose で info、通常は warn。
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// コマンドを実行する
fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    match cli.command {
        Commands::Compare {
            source,
            target,
            categories,
            ignore_owner,
            ignore_whitespaces,
            target_schema,
        } => {
            let handler = CompareCommandHandler::new();
            let command = CompareCommand {
                project_path,
                config_path: cli.config,
                source,
                target,
                categories,
                ignore_owner,
                ignore_whitespaces,
                target_schema,
                format: cli.format,
            };
            handler.execute(&command)
        }

        Commands::Diff {
            source,
            target,
            category,
            object,
            ignore_owner,
            ignore_whitespaces,
        } => {
            let handler = DiffCommandHandler::new();
            let command = DiffCommand {
                project_path,
                config_path: cli.config,
                source,
                target,
                category,
                object,
                ignore_owner,
                ignore_whitespaces,
                format: cli.format,
            };
            handler.execute(&command)
        }
    }
}
