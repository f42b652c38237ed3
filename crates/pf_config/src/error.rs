// crates/pf_config/src/error.rs

//! 参数层错误类型

/// 参数配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 参数名
        key: String,
        /// 参数值
        value: String,
        /// 原因
        reason: String,
    },

    /// 缺失配置（无默认值且未由外部提供）
    #[error("缺失配置: {0}（无默认值，必须由配置提供）")]
    Missing(String),

    /// 未知参数名
    #[error("未知参数: '{0}'")]
    UnknownKey(String),

    /// 取值类型与参数类型不符
    #[error("类型不匹配 '{key}': 期望 {expected}，实际 {found}")]
    TypeMismatch {
        /// 参数名
        key: String,
        /// 参数类型
        expected: String,
        /// 传入值的类型
        found: String,
    },
}

impl ConfigError {
    /// 构造无效值错误
    pub(crate) fn invalid(key: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "linear_solver_max_iterations".to_string(),
            value: "0".to_string(),
            reason: "必须为正".to_string(),
        };
        assert!(err.to_string().contains("linear_solver_max_iterations"));

        let err = ConfigError::Missing("lambs_constant".to_string());
        assert!(err.to_string().contains("lambs_constant"));
    }
}
