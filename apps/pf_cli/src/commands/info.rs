// apps/pf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、精度和参数表。

use anyhow::Result;
use clap::Args;
use pf_config::{ParameterGroup, Parameters, Precision};
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示默认参数表
    #[arg(long)]
    pub defaults: bool,

    /// 列出全部参数名、类型与说明
    #[arg(long)]
    pub keys: bool,

    /// 默认参数表使用的精度
    #[arg(short, long, default_value = "f64")]
    pub precision: Precision,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== PanelFlow 信息 ===");

    if !args.defaults && !args.keys {
        print_system_info();
        println!();
        print_default_table(args.precision);
        return Ok(());
    }

    if args.defaults {
        print_default_table(args.precision);
    }

    if args.keys {
        print_keys();
    }

    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("PanelFlow CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    println!("\n可用精度:");
    for p in [Precision::F32, Precision::F64] {
        println!("  - {} (机器精度 {:e})", p, p.epsilon());
    }
}

fn print_default_table(precision: Precision) {
    println!("=== 默认参数 ({}) ===", precision);

    let params = Parameters::with_precision(precision);
    for group in ParameterGroup::ALL {
        println!("\n[{}]", group);
        for key in group.keys() {
            match params.get(key) {
                Some(value) => println!("  {:<36} = {}", key.name(), value),
                None => println!("  {:<36} = <未指定，须由配置提供>", key.name()),
            }
        }
    }
}

fn print_keys() {
    println!("=== 参数列表 ===");
    for group in ParameterGroup::ALL {
        println!("\n[{}]", group);
        for key in group.keys() {
            println!("  {:<36} {:<8} {}", key.name(), key.kind(), key.description());
        }
    }
}
