// apps/pf_cli/src/commands/source.rs

//! 参数来源选项
//!
//! `validate` 与 `dump` 共用：默认值 -> 配置文件 -> `--set` 覆写。

use anyhow::{Context, Result};
use clap::Args;
use pf_config::{ParametersBuilder, Precision};
use std::path::PathBuf;
use tracing::info;

/// 参数来源
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// 参数文件路径（JSON）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆写单个参数，格式 key=value，可重复
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// 工作精度 (f32, f64)
    #[arg(short, long, default_value = "f64")]
    pub precision: Precision,
}

impl SourceArgs {
    /// 按来源顺序组装构建器（未验证）
    pub fn builder(&self) -> Result<ParametersBuilder> {
        let mut builder = ParametersBuilder::with_precision(self.precision);

        if let Some(path) = &self.config {
            info!("读取参数文件: {}", path.display());
            builder = builder
                .file(path)
                .with_context(|| format!("无法加载参数文件 {}", path.display()))?;
        }

        if !self.overrides.is_empty() {
            info!("应用 {} 个命令行覆写", self.overrides.len());
            builder = builder
                .assignments(&self.overrides)
                .context("命令行覆写无效")?;
        }

        Ok(builder)
    }
}
