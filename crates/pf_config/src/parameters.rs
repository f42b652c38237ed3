// crates/pf_config/src/parameters.rs

//! Parameters - 面元法求解器参数集
//!
//! 所有控制求解器数值行为的参数按用途分为六组。
//! 数值统一以 f64 存储；机器精度类默认值由 [`Precision`] 决定。
//!
//! 没有固定默认值的参数以 `Option` 表示，默认初始化后为 `None`，
//! 必须由外部配置提供，不会被赋予任何推测值。
//!
//! # 读写方式
//!
//! - 编译期路径：直接访问字段，例如 `params.wake.convect_wake = false`
//! - 键路径：[`Parameters::get`] / [`Parameters::set`]，供覆写来源使用
//!
//! 写入不做范围检查，也不通知任何使用方；范围检查见 [`Parameters::validate`]。

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::key::{ParameterKey, ParameterValue};
use crate::precision::Precision;

/// 线性求解器与边界层迭代参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverParams {
    /// BiCGSTAB 最大迭代次数
    pub linear_solver_max_iterations: usize,
    /// BiCGSTAB 收敛容差
    pub linear_solver_tolerance: f64,
    /// 边界层修正最大迭代次数
    pub max_boundary_layer_iterations: usize,
    /// 边界层修正收敛容差
    pub boundary_layer_iteration_tolerance: f64,
    /// 求逆容差（无默认值）
    pub inversion_tolerance: Option<f64>,
}

impl SolverParams {
    fn with_epsilon(eps: f64) -> Self {
        Self {
            linear_solver_max_iterations: 20000,
            linear_solver_tolerance: eps,
            max_boundary_layer_iterations: 100,
            boundary_layer_iteration_tolerance: eps,
            inversion_tolerance: None,
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self::with_epsilon(f64::EPSILON)
    }
}

/// 流体与压力计算参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowParams {
    /// 压力计算是否包含非定常项
    pub unsteady_bernoulli: bool,
    /// 最小压力系数，低于该值时发出警告（无默认值）
    pub min_pressure_coefficient: Option<f64>,
    /// 流体运动黏度 [m²/s]（无默认值）
    pub fluid_kinematic_viscosity: Option<f64>,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            unsteady_bernoulli: true,
            min_pressure_coefficient: None,
            fluid_kinematic_viscosity: None,
        }
    }
}

/// 尾迹模型参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WakeParams {
    /// 是否启用尾迹松弛/对流
    pub convect_wake: bool,
    /// 新尾迹单元是否沿后缘角平分线排列
    pub wake_emission_follow_bisector: bool,
    /// 新尾迹单元初始偏移距离系数
    pub wake_emission_distance_factor: f64,
    /// 涡奇点正则化半径
    pub wake_vortex_core_radius: f64,
    /// 关闭尾迹对流时的固定尾迹长度
    pub static_wake_length: f64,
}

impl Default for WakeParams {
    fn default() -> Self {
        Self {
            convect_wake: true,
            wake_emission_follow_bisector: true,
            wake_emission_distance_factor: 0.25,
            wake_vortex_core_radius: 0.0,
            static_wake_length: 100.0,
        }
    }
}

/// Ramasamy-Leishman 涡面模型参数
///
/// 参见 M. Ramasamy and J. G. Leishman, Reynolds Number Based Blade Tip
/// Vortex Model, University of Maryland, 2005。本组参数均无默认值。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VortexSheetParams {
    /// 是否启用该模型
    pub use_ramasamy_leishman_vortex_sheet: Option<bool>,
    /// 初始涡丝半径
    pub initial_vortex_core_radius: Option<f64>,
    /// 最小涡丝半径
    pub min_vortex_core_radius: Option<f64>,
    /// Lamb 常数
    pub lambs_constant: Option<f64>,
    /// a' 常数
    pub a_prime: Option<f64>,
}

/// 近壁插值层参数
///
/// 参见 K. Dixon et al., A 3D Unsteady Panel Method for Vertical Axis Wind
/// Turbines, DUWIND, 2008。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationLayerParams {
    /// 插值层厚度，0 表示关闭
    pub interpolation_layer_thickness: f64,
    /// 后缘缺口角 [rad]（无默认值）
    pub interpolation_layer_notch_angle: Option<f64>,
}

/// 几何阈值参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryParams {
    /// 绝对值低于该阈值的量视为零
    pub zero_threshold: f64,
    /// 面内配点的固定法向偏移距离
    pub collocation_point_delta: f64,
    /// 配点偏移系数：delta = factor · 最小边长（无默认值）
    pub collocation_point_delta_factor: Option<f64>,
    /// 相邻面元法向内积绝对值超过该值时视为尖锐边（无默认值）
    pub sharp_edge_threshold: Option<f64>,
}

impl GeometryParams {
    fn with_epsilon(eps: f64) -> Self {
        Self {
            zero_threshold: eps,
            collocation_point_delta: 1e-12,
            collocation_point_delta_factor: None,
            sharp_edge_threshold: None,
        }
    }
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self::with_epsilon(f64::EPSILON)
    }
}

/// 求解器参数集
///
/// 反序列化与参数文件共用同一覆写流程：先取 `precision`，
/// 未出现的参数取该精度下的默认值，未知参数名报错。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Parameters {
    /// 工作精度，决定机器精度类默认值
    pub precision: Precision,
    /// 线性求解器与边界层迭代
    pub solver: SolverParams,
    /// 流体与压力
    pub flow: FlowParams,
    /// 尾迹模型
    pub wake: WakeParams,
    /// Ramasamy-Leishman 涡面模型
    pub vortex_sheet: VortexSheetParams,
    /// 近壁插值层
    pub interpolation: InterpolationLayerParams,
    /// 几何阈值
    pub geometry: GeometryParams,
}

/// 可写参数槽
enum SlotMut<'a> {
    Real(&'a mut f64),
    OptReal(&'a mut Option<f64>),
    Integer(&'a mut usize),
    Flag(&'a mut bool),
    OptFlag(&'a mut Option<bool>),
}

impl Parameters {
    /// 双精度默认参数
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定工作精度的默认参数
    pub fn with_precision(precision: Precision) -> Self {
        let eps = precision.epsilon();
        Self {
            precision,
            solver: SolverParams::with_epsilon(eps),
            geometry: GeometryParams::with_epsilon(eps),
            ..Self::default()
        }
    }

    /// 切换工作精度
    ///
    /// 三个机器精度类参数（`linear_solver_tolerance`、
    /// `boundary_layer_iteration_tolerance`、`zero_threshold`）若与旧精度的机器精度
    /// 按位相等，则视为默认值并改为新精度的机器精度；其他值保持不变。
    ///
    /// 因此显式写入的旧机器精度（包括 `eps`）也会被重新推导。
    /// 需要保留某个精确值时，应先设置精度再写入该参数。
    pub fn set_precision(&mut self, precision: Precision) {
        let old = self.precision.epsilon().to_bits();
        let new = precision.epsilon();
        for slot in [
            &mut self.solver.linear_solver_tolerance,
            &mut self.solver.boundary_layer_iteration_tolerance,
            &mut self.geometry.zero_threshold,
        ] {
            if slot.to_bits() == old {
                *slot = new;
            }
        }
        self.precision = precision;
    }

    /// 读取参数当前值
    ///
    /// 仅当无默认值的参数尚未提供时返回 `None`。
    pub fn get(&self, key: ParameterKey) -> Option<ParameterValue> {
        use ParameterKey as K;
        use ParameterValue::{Flag, Integer, Real};
        match key {
            K::LinearSolverMaxIterations => Some(Integer(self.solver.linear_solver_max_iterations)),
            K::LinearSolverTolerance => Some(Real(self.solver.linear_solver_tolerance)),
            K::MaxBoundaryLayerIterations => Some(Integer(self.solver.max_boundary_layer_iterations)),
            K::BoundaryLayerIterationTolerance => {
                Some(Real(self.solver.boundary_layer_iteration_tolerance))
            }
            K::InversionTolerance => self.solver.inversion_tolerance.map(Real),
            K::UnsteadyBernoulli => Some(Flag(self.flow.unsteady_bernoulli)),
            K::MinPressureCoefficient => self.flow.min_pressure_coefficient.map(Real),
            K::FluidKinematicViscosity => self.flow.fluid_kinematic_viscosity.map(Real),
            K::ConvectWake => Some(Flag(self.wake.convect_wake)),
            K::WakeEmissionFollowBisector => Some(Flag(self.wake.wake_emission_follow_bisector)),
            K::WakeEmissionDistanceFactor => Some(Real(self.wake.wake_emission_distance_factor)),
            K::WakeVortexCoreRadius => Some(Real(self.wake.wake_vortex_core_radius)),
            K::StaticWakeLength => Some(Real(self.wake.static_wake_length)),
            K::UseRamasamyLeishmanVortexSheet => {
                self.vortex_sheet.use_ramasamy_leishman_vortex_sheet.map(Flag)
            }
            K::InitialVortexCoreRadius => self.vortex_sheet.initial_vortex_core_radius.map(Real),
            K::MinVortexCoreRadius => self.vortex_sheet.min_vortex_core_radius.map(Real),
            K::LambsConstant => self.vortex_sheet.lambs_constant.map(Real),
            K::APrime => self.vortex_sheet.a_prime.map(Real),
            K::InterpolationLayerThickness => {
                Some(Real(self.interpolation.interpolation_layer_thickness))
            }
            K::InterpolationLayerNotchAngle => {
                self.interpolation.interpolation_layer_notch_angle.map(Real)
            }
            K::ZeroThreshold => Some(Real(self.geometry.zero_threshold)),
            K::CollocationPointDelta => Some(Real(self.geometry.collocation_point_delta)),
            K::CollocationPointDeltaFactor => self.geometry.collocation_point_delta_factor.map(Real),
            K::SharpEdgeThreshold => self.geometry.sharp_edge_threshold.map(Real),
        }
    }

    fn slot_mut(&mut self, key: ParameterKey) -> SlotMut<'_> {
        use ParameterKey as K;
        match key {
            K::LinearSolverMaxIterations => SlotMut::Integer(&mut self.solver.linear_solver_max_iterations),
            K::LinearSolverTolerance => SlotMut::Real(&mut self.solver.linear_solver_tolerance),
            K::MaxBoundaryLayerIterations => {
                SlotMut::Integer(&mut self.solver.max_boundary_layer_iterations)
            }
            K::BoundaryLayerIterationTolerance => {
                SlotMut::Real(&mut self.solver.boundary_layer_iteration_tolerance)
            }
            K::InversionTolerance => SlotMut::OptReal(&mut self.solver.inversion_tolerance),
            K::UnsteadyBernoulli => SlotMut::Flag(&mut self.flow.unsteady_bernoulli),
            K::MinPressureCoefficient => SlotMut::OptReal(&mut self.flow.min_pressure_coefficient),
            K::FluidKinematicViscosity => SlotMut::OptReal(&mut self.flow.fluid_kinematic_viscosity),
            K::ConvectWake => SlotMut::Flag(&mut self.wake.convect_wake),
            K::WakeEmissionFollowBisector => SlotMut::Flag(&mut self.wake.wake_emission_follow_bisector),
            K::WakeEmissionDistanceFactor => SlotMut::Real(&mut self.wake.wake_emission_distance_factor),
            K::WakeVortexCoreRadius => SlotMut::Real(&mut self.wake.wake_vortex_core_radius),
            K::StaticWakeLength => SlotMut::Real(&mut self.wake.static_wake_length),
            K::UseRamasamyLeishmanVortexSheet => {
                SlotMut::OptFlag(&mut self.vortex_sheet.use_ramasamy_leishman_vortex_sheet)
            }
            K::InitialVortexCoreRadius => {
                SlotMut::OptReal(&mut self.vortex_sheet.initial_vortex_core_radius)
            }
            K::MinVortexCoreRadius => SlotMut::OptReal(&mut self.vortex_sheet.min_vortex_core_radius),
            K::LambsConstant => SlotMut::OptReal(&mut self.vortex_sheet.lambs_constant),
            K::APrime => SlotMut::OptReal(&mut self.vortex_sheet.a_prime),
            K::InterpolationLayerThickness => {
                SlotMut::Real(&mut self.interpolation.interpolation_layer_thickness)
            }
            K::InterpolationLayerNotchAngle => {
                SlotMut::OptReal(&mut self.interpolation.interpolation_layer_notch_angle)
            }
            K::ZeroThreshold => SlotMut::Real(&mut self.geometry.zero_threshold),
            K::CollocationPointDelta => SlotMut::Real(&mut self.geometry.collocation_point_delta),
            K::CollocationPointDeltaFactor => {
                SlotMut::OptReal(&mut self.geometry.collocation_point_delta_factor)
            }
            K::SharpEdgeThreshold => SlotMut::OptReal(&mut self.geometry.sharp_edge_threshold),
        }
    }

    /// 覆写参数
    ///
    /// 不做范围检查、不做类型转换、不通知任何使用方。
    /// 唯一的失败情形是取值类型与参数类型不符。
    pub fn set(&mut self, key: ParameterKey, value: impl Into<ParameterValue>) -> Result<(), ConfigError> {
        let value = value.into();
        match (self.slot_mut(key), value) {
            (SlotMut::Real(slot), ParameterValue::Real(v)) => *slot = v,
            (SlotMut::OptReal(slot), ParameterValue::Real(v)) => *slot = Some(v),
            (SlotMut::Integer(slot), ParameterValue::Integer(v)) => *slot = v,
            (SlotMut::Flag(slot), ParameterValue::Flag(v)) => *slot = v,
            (SlotMut::OptFlag(slot), ParameterValue::Flag(v)) => *slot = Some(v),
            _ => {
                return Err(ConfigError::TypeMismatch {
                    key: key.name().to_string(),
                    expected: key.kind().to_string(),
                    found: value.kind().to_string(),
                })
            }
        }
        Ok(())
    }

    /// 清除无默认值参数；有默认值的参数恢复为默认值
    pub fn unset(&mut self, key: ParameterKey) {
        match self.slot_mut(key) {
            SlotMut::OptReal(slot) => *slot = None,
            SlotMut::OptFlag(slot) => *slot = None,
            _ => self.reset(key),
        }
    }

    /// 将单个参数恢复为当前精度下的默认值
    pub fn reset(&mut self, key: ParameterKey) {
        let mut defaults = Self::with_precision(self.precision);
        match (self.slot_mut(key), defaults.slot_mut(key)) {
            (SlotMut::Real(slot), SlotMut::Real(default)) => *slot = *default,
            (SlotMut::OptReal(slot), SlotMut::OptReal(default)) => *slot = *default,
            (SlotMut::Integer(slot), SlotMut::Integer(default)) => *slot = *default,
            (SlotMut::Flag(slot), SlotMut::Flag(default)) => *slot = *default,
            (SlotMut::OptFlag(slot), SlotMut::OptFlag(default)) => *slot = *default,
            // 同一参数在两个实例上的槽类型相同
            _ => unreachable!("slot kind differs for {}", key),
        }
    }

    /// 将全部参数恢复为当前精度下的默认值
    pub fn reset_all(&mut self) {
        *self = Self::with_precision(self.precision);
    }

    /// 读取必需的实数参数
    pub fn require_real(&self, key: ParameterKey) -> Result<f64, ConfigError> {
        match self.get(key) {
            Some(ParameterValue::Real(v)) => Ok(v),
            Some(other) => Err(ConfigError::TypeMismatch {
                key: key.name().to_string(),
                expected: "real".to_string(),
                found: other.kind().to_string(),
            }),
            None => Err(ConfigError::Missing(key.name().to_string())),
        }
    }

    /// 读取必需的开关参数
    pub fn require_flag(&self, key: ParameterKey) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(ParameterValue::Flag(v)) => Ok(v),
            Some(other) => Err(ConfigError::TypeMismatch {
                key: key.name().to_string(),
                expected: "flag".to_string(),
                found: other.kind().to_string(),
            }),
            None => Err(ConfigError::Missing(key.name().to_string())),
        }
    }

    /// 按声明顺序遍历全部参数
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, Option<ParameterValue>)> + '_ {
        ParameterKey::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    /// 尚未提供的参数
    pub fn missing(&self) -> Vec<ParameterKey> {
        self.iter().filter(|(_, v)| v.is_none()).map(|(k, _)| k).collect()
    }

    /// 从 JSON 文件加载参数（在默认值之上覆写）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        crate::overrides::apply_file(&mut params, path)?;
        params.validate()?;
        Ok(params)
    }

    /// 保存参数到 JSON 文件
    ///
    /// 非有限实数无法用 JSON 表示，保存前报错而不是写出 `null`。
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_json()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 序列化为格式化 JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        for (key, value) in self.iter() {
            if let Some(ParameterValue::Real(v)) = value {
                if !v.is_finite() {
                    return Err(ConfigError::invalid(key.name(), v, "非有限值无法写入 JSON"));
                }
            }
        }
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        let mut params = Self::default();
        crate::overrides::apply_json(&mut params, &json)
            .map_err(<D::Error as serde::de::Error>::custom)?;
        Ok(params)
    }
}
