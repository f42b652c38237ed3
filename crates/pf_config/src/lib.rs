// crates/pf_config/src/lib.rs

//! PanelFlow 参数层
//!
//! 面元法气动求解器的全局数值参数：求解器容差、迭代上限、尾迹模型开关、
//! 涡核正则化常数、插值层几何和尖锐边阈值。本层只负责声明、默认值、
//! 验证和共享，不包含任何求解算法。
//!
//! # 模块概览
//!
//! - [`parameters`]: Parameters 参数集及六个分组
//! - [`key`]: ParameterKey 参数标识、ParameterValue 取值
//! - [`builder`]: ParametersBuilder 构建器、SharedParameters 只读共享
//! - [`overrides`]: JSON 文件与 `key=value` 覆写
//! - [`validation`]: 取值域检查与验证报告
//! - [`precision`]: Precision 工作精度
//! - [`error`]: 配置错误类型
//!
//! # 使用方式
//!
//! ```rust
//! use pf_config::{ParameterKey, ParametersBuilder};
//!
//! let params = ParametersBuilder::new()
//!     .set(ParameterKey::ConvectWake, false)?
//!     .build()?;
//!
//! assert_eq!(params.solver.linear_solver_max_iterations, 20000);
//! assert_eq!(params.wake.static_wake_length, 100.0);
//! # Ok::<(), pf_config::ConfigError>(())
//! ```
//!
//! # 设计原则
//!
//! 1. **无全局可变状态**: 参数集在运行前构建，之后以只读引用传入各组件
//! 2. **全 f64 存储**: 机器精度类默认值由 `Precision` 决定
//! 3. **不推测默认值**: 无默认值的参数为 `None`，必须由配置提供
//! 4. **写入不检查，构建时检查**: `set` 原样保存，`build` 统一验证

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod key;
pub mod overrides;
pub mod parameters;
pub mod precision;
pub mod validation;

// 重导出核心类型
pub use builder::{ParametersBuilder, SharedParameters};
pub use error::ConfigError;
pub use key::{ParameterGroup, ParameterKey, ParameterKind, ParameterValue};
pub use parameters::{
    FlowParams, GeometryParams, InterpolationLayerParams, Parameters, SolverParams, VortexSheetParams,
    WakeParams,
};
pub use precision::Precision;
pub use validation::{Domain, ValidationError, ValidationReport, ValidationWarning};
