// crates/pf_config/src/overrides.rs

//! 参数覆写来源
//!
//! 支持两种来源，按顺序叠加在默认值之上：
//!
//! 1. JSON 文件：分组对象或顶层参数名，仅覆写文件中出现的参数
//! 2. `key=value` 字符串：通常来自命令行
//!
//! ```json
//! {
//!   "precision": "f64",
//!   "solver": { "linear_solver_max_iterations": 5000 },
//!   "wake": { "convect_wake": false },
//!   "lambs_constant": 1.25643
//! }
//! ```
//!
//! `null` 表示清除该参数（无默认值的参数回到未提供状态）。

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;
use crate::key::{ParameterGroup, ParameterKey, ParameterKind, ParameterValue};
use crate::parameters::Parameters;
use crate::precision::Precision;

/// 从 JSON 文件读取覆写并应用
pub fn apply_file<P: AsRef<Path>>(params: &mut Parameters, path: P) -> Result<usize, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
    let count = apply_json(params, &json)?;
    debug!(path = %path.display(), count, "已应用参数文件");
    Ok(count)
}

/// 应用 JSON 覆写，返回被覆写的参数个数（不含 precision）
pub fn apply_json(params: &mut Parameters, json: &Value) -> Result<usize, ConfigError> {
    let root = json
        .as_object()
        .ok_or_else(|| ConfigError::Parse("参数文件顶层必须是 JSON 对象".to_string()))?;

    // 精度先于其他参数生效，避免覆写后的容差被重新推导
    if let Some(precision) = root.get("precision") {
        let name = precision
            .as_str()
            .ok_or_else(|| ConfigError::invalid("precision", precision, "应为字符串"))?;
        let precision = name
            .parse::<Precision>()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.set_precision(precision);
    }

    let mut count = 0;
    for (name, value) in root {
        if name == "precision" {
            continue;
        }
        if let Some(group) = ParameterGroup::ALL.iter().find(|g| g.name() == name.as_str()) {
            let members = value
                .as_object()
                .ok_or_else(|| ConfigError::invalid(name.as_str(), value, "分组应为 JSON 对象"))?;
            count += apply_group(params, *group, members)?;
        } else {
            let key: ParameterKey = name.parse()?;
            apply_value(params, key, value)?;
            count += 1;
        }
    }
    Ok(count)
}

fn apply_group(
    params: &mut Parameters,
    group: ParameterGroup,
    members: &Map<String, Value>,
) -> Result<usize, ConfigError> {
    for (name, value) in members {
        let key: ParameterKey = name.parse()?;
        if key.group() != group {
            return Err(ConfigError::invalid(
                format!("{}.{}", group, name),
                value,
                format!("参数属于分组 '{}'", key.group()),
            ));
        }
        apply_value(params, key, value)?;
    }
    Ok(members.len())
}

fn apply_value(params: &mut Parameters, key: ParameterKey, value: &Value) -> Result<(), ConfigError> {
    match json_to_value(key, value, params.precision)? {
        Some(v) => {
            debug!(key = key.name(), value = %v, "覆写参数");
            params.set(key, v)
        }
        None => {
            debug!(key = key.name(), "清除参数");
            params.unset(key);
            Ok(())
        }
    }
}

/// JSON 值转换为参数值；`null` 转换为 `None`，字符串 `"eps"` 取当前精度的机器精度
fn json_to_value(
    key: ParameterKey,
    value: &Value,
    precision: Precision,
) -> Result<Option<ParameterValue>, ConfigError> {
    let mismatch = || ConfigError::TypeMismatch {
        key: key.name().to_string(),
        expected: key.kind().to_string(),
        found: json_type_name(value).to_string(),
    };
    let parsed = match (key.kind(), value) {
        (_, Value::Null) => return Ok(None),
        (kind, Value::String(s)) => ParameterValue::parse(kind, s, precision)?,
        (ParameterKind::Real, Value::Number(n)) => {
            ParameterValue::Real(n.as_f64().ok_or_else(mismatch)?)
        }
        (ParameterKind::Integer, Value::Number(n)) => {
            let v = n.as_u64().ok_or_else(mismatch)?;
            let v = usize::try_from(v).map_err(|_| ConfigError::invalid(key.name(), v, "超出范围"))?;
            ParameterValue::Integer(v)
        }
        (ParameterKind::Flag, Value::Bool(b)) => ParameterValue::Flag(*b),
        _ => return Err(mismatch()),
    };
    Ok(Some(parsed))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "flag",
        Value::Number(n) if n.is_u64() || n.is_i64() => "integer",
        Value::Number(_) => "real",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 解析 `key=value` 形式的覆写，`eps` 按 `precision` 取值
pub fn parse_assignment(
    raw: &str,
    precision: Precision,
) -> Result<(ParameterKey, ParameterValue), ConfigError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::Parse(format!("覆写 '{}' 应为 key=value 形式", raw)))?;
    let key: ParameterKey = name.parse()?;
    let value = ParameterValue::parse(key.kind(), value, precision)?;
    Ok((key, value))
}

/// 应用一组 `key=value` 覆写
pub fn apply_assignments<I, S>(params: &mut Parameters, assignments: I) -> Result<usize, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut count = 0;
    for raw in assignments {
        let (key, value) = parse_assignment(raw.as_ref(), params.precision)?;
        debug!(key = key.name(), value = %value, "命令行覆写参数");
        params.set(key, value)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grouped_overrides() {
        let mut p = Parameters::default();
        let n = apply_json(
            &mut p,
            &json!({
                "solver": { "linear_solver_max_iterations": 5000 },
                "wake": { "convect_wake": false, "static_wake_length": 50 }
            }),
        )
        .unwrap();
        assert_eq!(n, 3);
        assert_eq!(p.solver.linear_solver_max_iterations, 5000);
        assert!(!p.wake.convect_wake);
        assert_eq!(p.wake.static_wake_length, 50.0);
        assert_eq!(p.wake.wake_emission_distance_factor, 0.25);
    }

    #[test]
    fn test_flat_overrides_and_null() {
        let mut p = Parameters::default();
        p.vortex_sheet.a_prime = Some(1e-4);
        apply_json(&mut p, &json!({ "lambs_constant": 1.25643, "a_prime": null })).unwrap();
        assert_eq!(p.vortex_sheet.lambs_constant, Some(1.25643));
        assert_eq!(p.vortex_sheet.a_prime, None);
    }

    #[test]
    fn test_precision_applied_first() {
        let mut p = Parameters::default();
        apply_json(
            &mut p,
            &json!({ "zero_threshold": 1e-9, "precision": "f32" }),
        )
        .unwrap();
        assert_eq!(p.precision, Precision::F32);
        assert_eq!(p.geometry.zero_threshold, 1e-9);
        assert_eq!(p.solver.linear_solver_tolerance, f32::EPSILON as f64);
    }

    #[test]
    fn test_wrong_group_rejected() {
        let mut p = Parameters::default();
        let err = apply_json(&mut p, &json!({ "wake": { "zero_threshold": 0.1 } })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_type_errors() {
        let mut p = Parameters::default();
        assert!(matches!(
            apply_json(&mut p, &json!({ "convect_wake": 1 })),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(apply_json(&mut p, &json!({ "linear_solver_max_iterations": 1.5 })).is_err());
        assert!(apply_json(&mut p, &json!({ "linear_solver_max_iterations": -1 })).is_err());
        assert!(matches!(
            apply_json(&mut p, &json!({ "wake_length": 1.0 })),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(apply_json(&mut p, &json!([1, 2])).is_err());
    }

    #[test]
    fn test_assignments() {
        let mut p = Parameters::default();
        let n = apply_assignments(
            &mut p,
            ["convect_wake=false", "linear_solver_tolerance=1e-10", "sharp_edge_threshold = 0.9"],
        )
        .unwrap();
        assert_eq!(n, 3);
        assert!(!p.wake.convect_wake);
        assert_eq!(p.solver.linear_solver_tolerance, 1e-10);
        assert_eq!(p.geometry.sharp_edge_threshold, Some(0.9));
        assert!(parse_assignment("convect_wake", Precision::F64).is_err());
        assert!(parse_assignment("convect_wake=0.5", Precision::F64).is_err());
    }

    #[test]
    fn test_eps_uses_working_precision() {
        let eps32 = (f32::EPSILON as f64).to_bits();

        let mut p = Parameters::with_precision(Precision::F32);
        p.geometry.zero_threshold = 0.5;
        apply_assignments(&mut p, ["zero_threshold=eps"]).unwrap();
        assert_eq!(p.geometry.zero_threshold.to_bits(), eps32);

        let mut p = Parameters::default();
        apply_json(
            &mut p,
            &json!({ "precision": "f32", "solver": { "linear_solver_tolerance": "eps" } }),
        )
        .unwrap();
        assert_eq!(p.solver.linear_solver_tolerance.to_bits(), eps32);

        // 精度改回 f64 时，写入的 eps 仍按默认值重新推导
        p.set_precision(Precision::F64);
        assert_eq!(p.solver.linear_solver_tolerance.to_bits(), f64::EPSILON.to_bits());
    }
}
