mod cli;
mod workflow;

use clap::Parser;
use cli::Args;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() {
    // コマンドライン引数を解析します
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = workflow::run(args) {
        eprintln!("エラー: {}", e);
        // 原因をたどって表示する
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  原因: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

/// ログの出力先は標準エラー。`RUST_LOG` があればそちらを優先します。
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
