// crates/pf_config/src/precision.rs

//! 工作精度选择
//!
//! 参数统一以 f64 存储，但"机器精度"类默认值取决于求解器实际使用的浮点类型。
//! `Precision` 决定这些默认值取 `f32::EPSILON` 还是 `f64::EPSILON`。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 求解器工作精度
///
/// # 示例
///
/// ```rust
/// use pf_config::Precision;
///
/// let precision = Precision::F32;
/// assert_eq!(precision.epsilon(), f32::EPSILON as f64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 单精度浮点 (f32)
    F32,
    /// 双精度浮点 (f64)，默认
    #[default]
    F64,
}

impl Precision {
    /// 获取精度名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// 该精度下的机器精度（以 f64 表示，位级精确）
    pub fn epsilon(&self) -> f64 {
        match self {
            Self::F32 => f32::EPSILON as f64,
            Self::F64 => f64::EPSILON,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 精度解析错误
#[derive(Debug, Clone, thiserror::Error)]
#[error("无效的精度值: '{0}', 期望 'f32' 或 'f64'")]
pub struct PrecisionParseError(String);

impl FromStr for Precision {
    type Err = PrecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float" | "single" | "float32" => Ok(Self::F32),
            "f64" | "double" | "float64" => Ok(Self::F64),
            _ => Err(PrecisionParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_default() {
        assert_eq!(Precision::default(), Precision::F64);
        assert_eq!(Precision::default().epsilon().to_bits(), f64::EPSILON.to_bits());
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!("f32".parse::<Precision>().unwrap(), Precision::F32);
        assert_eq!("F64".parse::<Precision>().unwrap(), Precision::F64);
        assert_eq!("double".parse::<Precision>().unwrap(), Precision::F64);
        assert!("f16".parse::<Precision>().is_err());
    }

    #[test]
    fn test_f32_epsilon_is_wider() {
        assert!(Precision::F32.epsilon() > Precision::F64.epsilon());
    }
}
