// apps/pf_cli/src/commands/validate.rs

//! 参数验证命令
//!
//! 按来源顺序组装参数集并检查取值域。

use anyhow::{bail, Result};
use clap::Args;
use pf_config::ValidationReport;
use tracing::{error, info, warn};

use super::source::SourceArgs;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// 严格模式（警告也视为错误，即要求所有参数都已提供）
    #[arg(long)]
    pub strict: bool,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== PanelFlow 参数验证 ===");

    let builder = args.source.builder()?;
    let report = builder.parameters().report();

    print_validation_result(&report, args.strict)
}

fn print_validation_result(report: &ValidationReport, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if report.has_errors() {
        println!("\n错误 ({}):", report.errors.len());
        for err in &report.errors {
            error!("{}", err);
            println!("  ✗ {}", err);
        }
    }

    if report.has_warnings() {
        println!("\n警告 ({}):", report.warnings.len());
        for warning in &report.warnings {
            warn!("{}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        report.is_valid_strict()
    } else {
        report.is_valid()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            report.errors.len(),
            report.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_config::Precision;

    fn args(overrides: &[&str], strict: bool) -> ValidateArgs {
        ValidateArgs {
            source: SourceArgs {
                config: None,
                overrides: overrides.iter().map(|s| s.to_string()).collect(),
                precision: Precision::F64,
            },
            strict,
        }
    }

    #[test]
    fn test_defaults_pass() {
        assert!(execute(args(&[], false)).is_ok());
    }

    #[test]
    fn test_defaults_fail_strict() {
        assert!(execute(args(&[], true)).is_err());
    }

    #[test]
    fn test_invalid_override_fails() {
        assert!(execute(args(&["static_wake_length=-1"], false)).is_err());
    }
}
