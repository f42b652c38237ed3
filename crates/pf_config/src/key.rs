// crates/pf_config/src/key.rs

//! 参数标识与取值类型
//!
//! 每个参数都有一个编译期已知的 [`ParameterKey`]，不存在任意字符串键。
//! 字符串名称仅用于覆写来源（JSON 文件、命令行 `key=value`）的解析。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::precision::Precision;

/// 参数语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// 实数（容差、阈值、物理常数、几何系数）
    Real,
    /// 整数（迭代上限）
    Integer,
    /// 开关
    Flag,
}

impl ParameterKind {
    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Integer => "integer",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 参数分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterGroup {
    /// 线性求解器与边界层迭代
    Solver,
    /// 流体与压力计算
    Flow,
    /// 尾迹模型
    Wake,
    /// Ramasamy-Leishman 涡面模型
    VortexSheet,
    /// 近壁插值层
    Interpolation,
    /// 几何阈值与配点偏移
    Geometry,
}

impl ParameterGroup {
    /// 全部分组（声明顺序）
    pub const ALL: [ParameterGroup; 6] = [
        Self::Solver,
        Self::Flow,
        Self::Wake,
        Self::VortexSheet,
        Self::Interpolation,
        Self::Geometry,
    ];

    /// 分组名称，与 JSON 中的分组字段一致
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solver => "solver",
            Self::Flow => "flow",
            Self::Wake => "wake",
            Self::VortexSheet => "vortex_sheet",
            Self::Interpolation => "interpolation",
            Self::Geometry => "geometry",
        }
    }

    /// 本组包含的参数
    pub fn keys(&self) -> impl Iterator<Item = ParameterKey> + '_ {
        ParameterKey::ALL.iter().copied().filter(move |k| k.group() == *self)
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 参数标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterKey {
    /// BiCGSTAB 线性求解器最大迭代次数
    LinearSolverMaxIterations,
    /// BiCGSTAB 线性求解器收敛容差
    LinearSolverTolerance,
    /// 边界层修正最大迭代次数
    MaxBoundaryLayerIterations,
    /// 边界层修正收敛容差
    BoundaryLayerIterationTolerance,
    /// 求逆容差
    InversionTolerance,
    /// 是否使用非定常 Bernoulli 方程
    UnsteadyBernoulli,
    /// 最小压力系数
    MinPressureCoefficient,
    /// 流体运动黏度
    FluidKinematicViscosity,
    /// 是否允许尾迹随流动演化
    ConvectWake,
    /// 新尾迹单元是否沿后缘角平分线发射
    WakeEmissionFollowBisector,
    /// 尾迹发射距离系数
    WakeEmissionDistanceFactor,
    /// 尾迹涡核正则化半径
    WakeVortexCoreRadius,
    /// 静态尾迹长度
    StaticWakeLength,
    /// 是否启用 Ramasamy-Leishman 涡面模型
    UseRamasamyLeishmanVortexSheet,
    /// 初始涡核半径
    InitialVortexCoreRadius,
    /// 最小涡核半径
    MinVortexCoreRadius,
    /// Lamb 常数
    LambsConstant,
    /// a' 常数
    APrime,
    /// 插值层厚度
    InterpolationLayerThickness,
    /// 插值层后缘缺口角
    InterpolationLayerNotchAngle,
    /// 零值阈值
    ZeroThreshold,
    /// 配点偏移距离
    CollocationPointDelta,
    /// 配点偏移系数
    CollocationPointDeltaFactor,
    /// 尖锐边阈值
    SharpEdgeThreshold,
}

impl ParameterKey {
    /// 全部参数（声明顺序）
    pub const ALL: [ParameterKey; 24] = [
        Self::LinearSolverMaxIterations,
        Self::LinearSolverTolerance,
        Self::MaxBoundaryLayerIterations,
        Self::BoundaryLayerIterationTolerance,
        Self::InversionTolerance,
        Self::UnsteadyBernoulli,
        Self::MinPressureCoefficient,
        Self::FluidKinematicViscosity,
        Self::ConvectWake,
        Self::WakeEmissionFollowBisector,
        Self::WakeEmissionDistanceFactor,
        Self::WakeVortexCoreRadius,
        Self::StaticWakeLength,
        Self::UseRamasamyLeishmanVortexSheet,
        Self::InitialVortexCoreRadius,
        Self::MinVortexCoreRadius,
        Self::LambsConstant,
        Self::APrime,
        Self::InterpolationLayerThickness,
        Self::InterpolationLayerNotchAngle,
        Self::ZeroThreshold,
        Self::CollocationPointDelta,
        Self::CollocationPointDeltaFactor,
        Self::SharpEdgeThreshold,
    ];

    /// 参数名称（snake_case，与 JSON 字段一致）
    pub fn name(&self) -> &'static str {
        match self {
            Self::LinearSolverMaxIterations => "linear_solver_max_iterations",
            Self::LinearSolverTolerance => "linear_solver_tolerance",
            Self::MaxBoundaryLayerIterations => "max_boundary_layer_iterations",
            Self::BoundaryLayerIterationTolerance => "boundary_layer_iteration_tolerance",
            Self::InversionTolerance => "inversion_tolerance",
            Self::UnsteadyBernoulli => "unsteady_bernoulli",
            Self::MinPressureCoefficient => "min_pressure_coefficient",
            Self::FluidKinematicViscosity => "fluid_kinematic_viscosity",
            Self::ConvectWake => "convect_wake",
            Self::WakeEmissionFollowBisector => "wake_emission_follow_bisector",
            Self::WakeEmissionDistanceFactor => "wake_emission_distance_factor",
            Self::WakeVortexCoreRadius => "wake_vortex_core_radius",
            Self::StaticWakeLength => "static_wake_length",
            Self::UseRamasamyLeishmanVortexSheet => "use_ramasamy_leishman_vortex_sheet",
            Self::InitialVortexCoreRadius => "initial_vortex_core_radius",
            Self::MinVortexCoreRadius => "min_vortex_core_radius",
            Self::LambsConstant => "lambs_constant",
            Self::APrime => "a_prime",
            Self::InterpolationLayerThickness => "interpolation_layer_thickness",
            Self::InterpolationLayerNotchAngle => "interpolation_layer_notch_angle",
            Self::ZeroThreshold => "zero_threshold",
            Self::CollocationPointDelta => "collocation_point_delta",
            Self::CollocationPointDeltaFactor => "collocation_point_delta_factor",
            Self::SharpEdgeThreshold => "sharp_edge_threshold",
        }
    }

    /// 语义类型
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::LinearSolverMaxIterations | Self::MaxBoundaryLayerIterations => {
                ParameterKind::Integer
            }
            Self::UnsteadyBernoulli
            | Self::ConvectWake
            | Self::WakeEmissionFollowBisector
            | Self::UseRamasamyLeishmanVortexSheet => ParameterKind::Flag,
            _ => ParameterKind::Real,
        }
    }

    /// 所属分组
    pub fn group(&self) -> ParameterGroup {
        match self {
            Self::LinearSolverMaxIterations
            | Self::LinearSolverTolerance
            | Self::MaxBoundaryLayerIterations
            | Self::BoundaryLayerIterationTolerance
            | Self::InversionTolerance => ParameterGroup::Solver,
            Self::UnsteadyBernoulli
            | Self::MinPressureCoefficient
            | Self::FluidKinematicViscosity => ParameterGroup::Flow,
            Self::ConvectWake
            | Self::WakeEmissionFollowBisector
            | Self::WakeEmissionDistanceFactor
            | Self::WakeVortexCoreRadius
            | Self::StaticWakeLength => ParameterGroup::Wake,
            Self::UseRamasamyLeishmanVortexSheet
            | Self::InitialVortexCoreRadius
            | Self::MinVortexCoreRadius
            | Self::LambsConstant
            | Self::APrime => ParameterGroup::VortexSheet,
            Self::InterpolationLayerThickness | Self::InterpolationLayerNotchAngle => {
                ParameterGroup::Interpolation
            }
            Self::ZeroThreshold
            | Self::CollocationPointDelta
            | Self::CollocationPointDeltaFactor
            | Self::SharpEdgeThreshold => ParameterGroup::Geometry,
        }
    }

    /// 是否有固定默认值
    ///
    /// 无默认值的参数必须由外部配置提供，不会被赋予任何推测值。
    pub fn has_default(&self) -> bool {
        !matches!(
            self,
            Self::InversionTolerance
                | Self::MinPressureCoefficient
                | Self::FluidKinematicViscosity
                | Self::UseRamasamyLeishmanVortexSheet
                | Self::InitialVortexCoreRadius
                | Self::MinVortexCoreRadius
                | Self::LambsConstant
                | Self::APrime
                | Self::InterpolationLayerNotchAngle
                | Self::CollocationPointDeltaFactor
                | Self::SharpEdgeThreshold
        )
    }

    /// 参数说明
    pub fn description(&self) -> &'static str {
        match self {
            Self::LinearSolverMaxIterations => "BiCGSTAB 线性求解器最大迭代次数",
            Self::LinearSolverTolerance => "BiCGSTAB 线性求解器收敛容差",
            Self::MaxBoundaryLayerIterations => "边界层修正循环最大迭代次数",
            Self::BoundaryLayerIterationTolerance => "边界层修正循环收敛容差",
            Self::InversionTolerance => "低于该阈值的量在求逆时视为零",
            Self::UnsteadyBernoulli => "压力计算中是否包含非定常项",
            Self::MinPressureCoefficient => "最小压力系数，低于该值时发出警告",
            Self::FluidKinematicViscosity => "流体运动黏度",
            Self::ConvectWake => "是否启用尾迹松弛/对流",
            Self::WakeEmissionFollowBisector => "新尾迹单元是否沿后缘角平分线排列",
            Self::WakeEmissionDistanceFactor => "新尾迹单元初始偏移距离的缩放系数",
            Self::WakeVortexCoreRadius => "涡奇点的正则化半径",
            Self::StaticWakeLength => "关闭尾迹对流时使用的固定尾迹长度",
            Self::UseRamasamyLeishmanVortexSheet => "是否使用 Ramasamy-Leishman 涡面模型",
            Self::InitialVortexCoreRadius => "Ramasamy-Leishman 模型的初始涡丝半径",
            Self::MinVortexCoreRadius => "Ramasamy-Leishman 模型的最小涡丝半径",
            Self::LambsConstant => "Ramasamy-Leishman 模型中的 Lamb 常数",
            Self::APrime => "Ramasamy-Leishman 模型中的 a' 常数",
            Self::InterpolationLayerThickness => "近壁插值层厚度（0 表示关闭）",
            Self::InterpolationLayerNotchAngle => "插值层后缘缺口角",
            Self::ZeroThreshold => "绝对值低于该阈值的量视为零",
            Self::CollocationPointDelta => "面内配点的固定法向偏移距离",
            Self::CollocationPointDeltaFactor => "最小面元边长乘以该系数得到配点偏移距离",
            Self::SharpEdgeThreshold => "相邻面元法向内积绝对值超过该阈值时视为尖锐边",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
    }
}

/// 参数取值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// 实数值
    Real(f64),
    /// 整数值
    Integer(usize),
    /// 开关值
    Flag(bool),
}

impl ParameterValue {
    /// 取值的语义类型
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Real(_) => ParameterKind::Real,
            Self::Integer(_) => ParameterKind::Integer,
            Self::Flag(_) => ParameterKind::Flag,
        }
    }

    /// 按给定类型解析字符串
    ///
    /// 实数接受 Rust 浮点字面量语法以及 `eps`，后者取 `precision` 的机器精度，
    /// 与该精度下容差默认值按位一致。
    pub fn parse(kind: ParameterKind, raw: &str, precision: Precision) -> Result<Self, ConfigError> {
        let s = raw.trim();
        let parse_err = |e: &dyn fmt::Display| {
            ConfigError::Parse(format!("无法将 '{}' 解析为 {}: {}", s, kind, e))
        };
        match kind {
            ParameterKind::Real => {
                if s.eq_ignore_ascii_case("eps") {
                    return Ok(Self::Real(precision.epsilon()));
                }
                s.parse::<f64>().map(Self::Real).map_err(|e| parse_err(&e))
            }
            ParameterKind::Integer => s.parse::<usize>().map(Self::Integer).map_err(|e| parse_err(&e)),
            ParameterKind::Flag => match s.to_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(Self::Flag(true)),
                "false" | "off" | "no" | "0" => Ok(Self::Flag(false)),
                _ => Err(parse_err(&"期望 true/false")),
            },
        }
    }

    /// 实数值
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// 整数值
    pub fn as_integer(&self) -> Option<usize> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// 开关值
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) if *v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) => write!(f, "{:e}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Flag(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<usize> for ParameterValue {
    fn from(v: usize) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in ParameterKey::ALL {
            assert_eq!(key.name().parse::<ParameterKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = ParameterKey::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ParameterKey::ALL.len());
    }

    #[test]
    fn test_unknown_key() {
        let err = "wake_length".parse::<ParameterKey>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "wake_length"));
    }

    #[test]
    fn test_groups_cover_all_keys() {
        let total: usize = ParameterGroup::ALL.iter().map(|g| g.keys().count()).sum();
        assert_eq!(total, ParameterKey::ALL.len());
        assert_eq!(ParameterGroup::VortexSheet.keys().count(), 5);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ParameterKey::LinearSolverMaxIterations.kind(), ParameterKind::Integer);
        assert_eq!(ParameterKey::ConvectWake.kind(), ParameterKind::Flag);
        assert_eq!(ParameterKey::APrime.kind(), ParameterKind::Real);
        let unspecified = ParameterKey::ALL.iter().filter(|k| !k.has_default()).count();
        assert_eq!(unspecified, 11);
    }

    #[test]
    fn test_value_parse() {
        let f64p = Precision::F64;
        assert_eq!(
            ParameterValue::parse(ParameterKind::Real, "0.5", f64p).unwrap(),
            ParameterValue::Real(0.5)
        );
        assert_eq!(
            ParameterValue::parse(ParameterKind::Real, "eps", f64p).unwrap(),
            ParameterValue::Real(f64::EPSILON)
        );
        assert_eq!(
            ParameterValue::parse(ParameterKind::Integer, " 42 ", f64p).unwrap(),
            ParameterValue::Integer(42)
        );
        assert_eq!(
            ParameterValue::parse(ParameterKind::Flag, "off", f64p).unwrap(),
            ParameterValue::Flag(false)
        );
        assert!(ParameterValue::parse(ParameterKind::Integer, "-3", f64p).is_err());
        assert!(ParameterValue::parse(ParameterKind::Flag, "maybe", f64p).is_err());
    }

    #[test]
    fn test_eps_follows_precision() {
        let v = ParameterValue::parse(ParameterKind::Real, "EPS", Precision::F32).unwrap();
        let bits = v.as_real().unwrap().to_bits();
        assert_eq!(bits, (f32::EPSILON as f64).to_bits());
        assert_ne!(bits, f64::EPSILON.to_bits());
    }
}
