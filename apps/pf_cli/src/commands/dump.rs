// apps/pf_cli/src/commands/dump.rs

//! 参数导出命令
//!
//! 输出解析后的完整参数集（JSON），可作为下一次运行的参数文件。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::source::SourceArgs;

/// 导出参数
#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// 输出文件路径（缺省时输出到标准输出）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行导出命令
pub fn execute(args: DumpArgs) -> Result<()> {
    let params = args.source.builder()?.build().context("参数集无效")?;

    match &args.output {
        Some(path) => {
            params
                .save_to_file(path)
                .with_context(|| format!("无法写入 {}", path.display()))?;
            info!("参数已写入 {}", path.display());
        }
        None => println!("{}", params.to_json()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_config::{Parameters, Precision};

    #[test]
    fn test_dump_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolved.json");

        let args = DumpArgs {
            source: SourceArgs {
                config: None,
                overrides: vec!["a_prime=6.5e-5".to_string(), "convect_wake=false".to_string()],
                precision: Precision::F32,
            },
            output: Some(path.clone()),
        };
        execute(args).unwrap();

        let loaded = Parameters::from_file(&path).unwrap();
        assert_eq!(loaded.precision, Precision::F32);
        assert_eq!(loaded.vortex_sheet.a_prime, Some(6.5e-5));
        assert!(!loaded.wake.convect_wake);
    }
}
