// crates/pf_config/src/builder.rs

//! 参数集构建与共享
//!
//! 求解器遵循"运行前配置、运行中只读"的约定：
//!
//! ```text
//! 默认值 ─> JSON 文件 ─> key=value 覆写 ─> build() 验证 ─> SharedParameters
//!          (ParametersBuilder，可变)                        (Arc，只读，可跨线程)
//! ```
//!
//! `SharedParameters` 不提供任何可变访问，求解器各组件持有其克隆或 `&Parameters`。

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::key::{ParameterKey, ParameterValue};
use crate::overrides;
use crate::parameters::Parameters;
use crate::precision::Precision;

/// 参数集构建器
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl ParametersBuilder {
    /// 从双精度默认值开始
    pub fn new() -> Self {
        Self::default()
    }

    /// 从指定精度的默认值开始
    pub fn with_precision(precision: Precision) -> Self {
        Self {
            params: Parameters::with_precision(precision),
        }
    }

    /// 从已有参数集开始
    pub fn from_parameters(params: Parameters) -> Self {
        Self { params }
    }

    /// 切换工作精度
    ///
    /// 仍与旧机器精度按位相等的容差会被重新推导，即使它是显式写入的，
    /// 见 [`Parameters::set_precision`]。应在其他覆写之前调用。
    pub fn precision(mut self, precision: Precision) -> Self {
        self.params.set_precision(precision);
        self
    }

    /// 按键覆写参数（不做范围检查）
    pub fn set(mut self, key: ParameterKey, value: impl Into<ParameterValue>) -> Result<Self, ConfigError> {
        self.params.set(key, value)?;
        Ok(self)
    }

    /// 读取当前值
    pub fn get(&self, key: ParameterKey) -> Option<ParameterValue> {
        self.params.get(key)
    }

    /// 直接修改参数字段
    pub fn configure(mut self, f: impl FnOnce(&mut Parameters)) -> Self {
        f(&mut self.params);
        self
    }

    /// 应用 JSON 参数文件
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        overrides::apply_file(&mut self.params, path)?;
        Ok(self)
    }

    /// 应用 `key=value` 覆写
    pub fn assignments<I, S>(mut self, assignments: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        overrides::apply_assignments(&mut self.params, assignments)?;
        Ok(self)
    }

    /// 恢复单个参数的默认值
    pub fn reset(mut self, key: ParameterKey) -> Self {
        self.params.reset(key);
        self
    }

    /// 恢复全部默认值
    pub fn reset_all(mut self) -> Self {
        self.params.reset_all();
        self
    }

    /// 当前参数（未验证）
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// 验证并冻结参数集
    ///
    /// 无默认值的参数允许缺失，每个缺失项记录一条警告。
    pub fn build(self) -> Result<SharedParameters, ConfigError> {
        let report = self.params.report();
        if let Some(err) = report.errors.into_iter().next() {
            return Err(err.into());
        }
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        info!(
            precision = %self.params.precision,
            missing = self.params.missing().len(),
            "参数集已构建"
        );
        Ok(SharedParameters::new(self.params))
    }

    /// 验证并冻结参数集，要求所有参数都已提供
    pub fn build_strict(self) -> Result<SharedParameters, ConfigError> {
        self.params.validate_complete()?;
        info!(precision = %self.params.precision, "参数集已构建（严格模式）");
        Ok(SharedParameters::new(self.params))
    }
}

/// 只读共享参数集
///
/// 构建后不可修改；克隆只增加引用计数。
#[derive(Debug, Clone, PartialEq)]
pub struct SharedParameters(Arc<Parameters>);

impl SharedParameters {
    fn new(params: Parameters) -> Self {
        Self(Arc::new(params))
    }

    /// 以当前快照为起点开始新的配置
    pub fn to_builder(&self) -> ParametersBuilder {
        ParametersBuilder::from_parameters((*self.0).clone())
    }

    /// 复制出一份可独立修改的参数集
    pub fn to_parameters(&self) -> Parameters {
        (*self.0).clone()
    }
}

impl Deref for SharedParameters {
    type Target = Parameters;

    fn deref(&self) -> &Parameters {
        &self.0
    }
}

impl AsRef<Parameters> for SharedParameters {
    fn as_ref(&self) -> &Parameters {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let shared = ParametersBuilder::new().build().unwrap();
        assert_eq!(shared.solver.linear_solver_max_iterations, 20000);
        assert_eq!(*shared, Parameters::default());
    }

    #[test]
    fn test_build_rejects_invalid() {
        let err = ParametersBuilder::new()
            .set(ParameterKey::LinearSolverMaxIterations, 0usize)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_build_strict_requires_all() {
        let err = ParametersBuilder::new().build_strict().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_last_write_wins() {
        let b = ParametersBuilder::new()
            .set(ParameterKey::StaticWakeLength, 10.0)
            .unwrap()
            .set(ParameterKey::StaticWakeLength, 20.0)
            .unwrap();
        assert_eq!(b.get(ParameterKey::StaticWakeLength), Some(ParameterValue::Real(20.0)));
    }

    #[test]
    fn test_to_builder_does_not_touch_snapshot() {
        let shared = ParametersBuilder::new().build().unwrap();
        let other = shared
            .to_builder()
            .configure(|p| p.wake.convect_wake = false)
            .build()
            .unwrap();
        assert!(shared.wake.convect_wake);
        assert!(!other.wake.convect_wake);
    }

    #[test]
    fn test_reset_in_builder() {
        let b = ParametersBuilder::new()
            .set(ParameterKey::WakeEmissionDistanceFactor, 0.5)
            .unwrap()
            .reset(ParameterKey::WakeEmissionDistanceFactor);
        assert_eq!(b.parameters().wake.wake_emission_distance_factor, 0.25);
    }

    #[test]
    fn test_precision_before_assignments_keeps_eps() {
        let shared = ParametersBuilder::new()
            .precision(Precision::F32)
            .assignments(["linear_solver_tolerance=eps"])
            .unwrap()
            .set(ParameterKey::ZeroThreshold, f64::EPSILON)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(shared.solver.linear_solver_tolerance, f32::EPSILON as f64);
        assert_eq!(shared.geometry.zero_threshold.to_bits(), f64::EPSILON.to_bits());
    }

    #[test]
    fn test_shared_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedParameters>();
    }
}
