// apps/pf_cli/src/main.rs

//! PanelFlow 命令行界面
//!
//! 检查、验证和导出面元法求解器的参数集。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// PanelFlow 参数工具
#[derive(Parser)]
#[command(name = "pf_cli")]
#[command(author = "PanelFlow Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "PanelFlow panel-method solver parameters", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示信息与默认参数
    Info(commands::info::InfoArgs),
    /// 验证参数集
    Validate(commands::validate::ValidateArgs),
    /// 导出解析后的参数集
    Dump(commands::dump::DumpArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Dump(args) => commands::dump::execute(args),
    }
}
