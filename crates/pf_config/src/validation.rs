// crates/pf_config/src/validation.rs

//! 参数范围验证
//!
//! 写入参数时不做任何检查；范围检查集中在构建参数集时进行，
//! 以单一错误结果的形式报告，避免非法值悄悄流入数值代码。
//!
//! # 示例
//!
//! ```
//! use pf_config::Parameters;
//!
//! let mut params = Parameters::default();
//! params.solver.linear_solver_max_iterations = 0;
//!
//! let report = params.report();
//! assert!(report.has_errors());
//! assert!(params.validate().is_err());
//! ```

use std::fmt;

use crate::error::ConfigError;
use crate::key::{ParameterKey, ParameterValue};
use crate::parameters::Parameters;

/// 参数取值域
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// 有限值，无符号约束
    Finite,
    /// 非负有限值
    NonNegative,
    /// 正有限值
    Positive,
    /// 闭区间 [0, 1]
    UnitInterval,
    /// 正整数
    PositiveInteger,
    /// 开关，无约束
    Any,
}

impl Domain {
    /// 参数的取值域
    pub fn of(key: ParameterKey) -> Self {
        use ParameterKey as K;
        match key {
            K::LinearSolverMaxIterations | K::MaxBoundaryLayerIterations => Self::PositiveInteger,
            K::UnsteadyBernoulli
            | K::ConvectWake
            | K::WakeEmissionFollowBisector
            | K::UseRamasamyLeishmanVortexSheet => Self::Any,
            K::MinPressureCoefficient => Self::Finite,
            K::LambsConstant => Self::Positive,
            K::SharpEdgeThreshold => Self::UnitInterval,
            _ => Self::NonNegative,
        }
    }

    fn contains(&self, value: ParameterValue) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::PositiveInteger, ParameterValue::Integer(n)) => n > 0,
            (_, ParameterValue::Real(v)) if !v.is_finite() => false,
            (Self::Finite, ParameterValue::Real(_)) => true,
            (Self::NonNegative, ParameterValue::Real(v)) => v >= 0.0,
            (Self::Positive, ParameterValue::Real(v)) => v > 0.0,
            (Self::UnitInterval, ParameterValue::Real(v)) => (0.0..=1.0).contains(&v),
            _ => false,
        }
    }

    /// 取值域说明
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Finite => "必须为有限值",
            Self::NonNegative => "必须为非负有限值",
            Self::Positive => "必须为正的有限值",
            Self::UnitInterval => "必须位于 [0, 1] 区间",
            Self::PositiveInteger => "必须为正整数",
            Self::Any => "无约束",
        }
    }
}

/// 验证报告
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 警告列表
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 严格模式是否通过（无错误且无警告）
    pub fn is_valid_strict(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.errors.len())?;
        writeln!(f, "  警告: {} 个", self.warnings.len())?;

        for (i, err) in self.errors.iter().enumerate() {
            writeln!(f, "  E{}. {}", i + 1, err)?;
        }
        for (i, warn) in self.warnings.iter().enumerate() {
            writeln!(f, "  W{}. {}", i + 1, warn)?;
        }
        Ok(())
    }
}

/// 验证错误
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// 超出取值域
    OutOfDomain {
        /// 参数
        key: ParameterKey,
        /// 实际值
        value: ParameterValue,
        /// 取值域
        domain: Domain,
    },
    /// 参数间不一致
    Inconsistent {
        /// 触发检查的参数
        key: ParameterKey,
        /// 实际值
        value: ParameterValue,
        /// 描述
        message: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDomain { key, value, domain } => {
                write!(f, "{}={} {}", key, value, domain.describe())
            }
            Self::Inconsistent { key, value, message } => {
                write!(f, "{}={}: {}", key, value, message)
            }
        }
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::OutOfDomain { key, value, domain } => {
                ConfigError::invalid(key.name(), value, domain.describe())
            }
            ValidationError::Inconsistent { key, value, message } => {
                ConfigError::invalid(key.name(), value, message)
            }
        }
    }
}

/// 验证警告
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// 无默认值的参数尚未提供
    Unset {
        /// 参数
        key: ParameterKey,
    },
    /// 已启用模型但其常数未提供
    IncompleteModel {
        /// 模型开关
        switch: ParameterKey,
        /// 缺失的常数
        missing: Vec<ParameterKey>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset { key } => write!(f, "{} 未提供（无默认值）", key),
            Self::IncompleteModel { switch, missing } => {
                let names: Vec<_> = missing.iter().map(|k| k.name()).collect();
                write!(f, "{} 已启用，但缺少: {}", switch, names.join(", "))
            }
        }
    }
}

impl Parameters {
    /// 生成完整验证报告
    pub fn report(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (key, value) in self.iter() {
            match value {
                Some(v) => {
                    let domain = Domain::of(key);
                    if !domain.contains(v) {
                        report.add_error(ValidationError::OutOfDomain { key, value: v, domain });
                    }
                }
                None => report.add_warning(ValidationWarning::Unset { key }),
            }
        }

        let sheet = &self.vortex_sheet;
        if let (Some(initial), Some(min)) = (sheet.initial_vortex_core_radius, sheet.min_vortex_core_radius) {
            if min > initial {
                report.add_error(ValidationError::Inconsistent {
                    key: ParameterKey::MinVortexCoreRadius,
                    value: ParameterValue::Real(min),
                    message: format!("不能大于 initial_vortex_core_radius={}", initial),
                });
            }
        }

        if sheet.use_ramasamy_leishman_vortex_sheet == Some(true) {
            let missing: Vec<_> = [
                ParameterKey::InitialVortexCoreRadius,
                ParameterKey::MinVortexCoreRadius,
                ParameterKey::LambsConstant,
                ParameterKey::APrime,
            ]
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect();
            if !missing.is_empty() {
                report.add_warning(ValidationWarning::IncompleteModel {
                    switch: ParameterKey::UseRamasamyLeishmanVortexSheet,
                    missing,
                });
            }
        }

        report
    }

    /// 验证参数有效性，返回第一个错误
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.report().errors.into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// 验证参数有效性，且要求所有参数都已提供
    pub fn validate_complete(&self) -> Result<(), ConfigError> {
        self.validate()?;
        match self.missing().first() {
            Some(key) => Err(ConfigError::Missing(key.name().to_string())),
            None => Ok(()),
        }
    }
}
