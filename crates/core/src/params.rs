//! Parameter extraction helpers and the declarative per-algorithm schema.
//!
//! Parameters arrive as a `serde_json::Value` object. The `param_*` helpers
//! never fail: a missing key or a value of the wrong type yields the default.
//! A [`ParamSchema`] lists every key an algorithm understands together with
//! its kind, default and legal range. The same table drives UI generation
//! ([`ParamSchema::to_json`]), the "reset" action ([`ParamSchema::defaults`]),
//! optional strict validation ([`ParamSchema::validate`]), and the clamping
//! done when a renderer reads its parameters.

use crate::error::EngineError;
use serde_json::{Map, Value};

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// What kind of value a parameter holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Continuous number.
    Number,
    /// Whole number (counts, sizes, depths).
    Integer,
    /// Digit-set rule string such as `"23"`.
    Rule,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Rule => "string",
        }
    }
}

/// Default value of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Number(f64),
    Rule(&'static str),
}

/// One parameter: key, kind, default and slider range.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub description: &'static str,
}

impl ParamSpec {
    /// Numeric spec constructor used by the static tables.
    pub const fn number(
        key: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            kind: ParamKind::Number,
            default: ParamDefault::Number(default),
            min,
            max,
            step,
            description,
        }
    }

    pub const fn integer(
        key: &'static str,
        default: f64,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            kind: ParamKind::Integer,
            default: ParamDefault::Number(default),
            min,
            max,
            step: 1.0,
            description,
        }
    }

    pub const fn rule(key: &'static str, default: &'static str, description: &'static str) -> Self {
        Self {
            key,
            kind: ParamKind::Rule,
            default: ParamDefault::Rule(default),
            min: 0.0,
            max: 0.0,
            step: 0.0,
            description,
        }
    }

    fn default_number(&self) -> f64 {
        match self.default {
            ParamDefault::Number(v) => v,
            ParamDefault::Rule(_) => 0.0,
        }
    }

    /// Reads a number, falling back to the default and clamping into range.
    pub fn read_f64(&self, params: &Value) -> f64 {
        let v = param_f64(params, self.key, self.default_number());
        if v.is_nan() {
            return self.default_number();
        }
        v.clamp(self.min, self.max)
    }

    /// Reads a whole number: [`read_f64`](Self::read_f64) rounded to nearest.
    pub fn read_usize(&self, params: &Value) -> usize {
        self.read_f64(params).round().max(0.0) as usize
    }

    /// Reads a rule string, falling back to the default.
    pub fn read_rule(&self, params: &Value) -> String {
        match self.default {
            ParamDefault::Rule(d) => param_string(params, self.key, d),
            ParamDefault::Number(_) => param_string(params, self.key, ""),
        }
    }

    fn default_json(&self) -> Value {
        match self.default {
            ParamDefault::Number(v) if self.kind == ParamKind::Integer => Value::from(v as u64),
            ParamDefault::Number(v) => Value::from(v),
            ParamDefault::Rule(s) => Value::from(s),
        }
    }

    fn check(&self, value: &Value) -> Result<(), EngineError> {
        let mismatch = |got: &str| EngineError::ParamTypeMismatch {
            name: self.key.to_string(),
            expected: self.kind.as_str().to_string(),
            got: got.to_string(),
        };
        match self.kind {
            ParamKind::Rule => value.as_str().map(|_| ()).ok_or_else(|| mismatch(json_type(value))),
            ParamKind::Number | ParamKind::Integer => {
                let v = value.as_f64().ok_or_else(|| mismatch(json_type(value)))?;
                if self.kind == ParamKind::Integer && v.fract() != 0.0 {
                    return Err(mismatch("fractional number"));
                }
                if v < self.min || v > self.max {
                    return Err(EngineError::ParamOutOfRange {
                        name: self.key.to_string(),
                        value: v,
                        min: self.min,
                        max: self.max,
                    });
                }
                Ok(())
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The full parameter table of one algorithm.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    pub algorithm: &'static str,
    pub params: &'static [ParamSpec],
}

impl ParamSchema {
    /// Spec for `key`, if the algorithm has it.
    pub fn get(&self, key: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.key == key)
    }

    /// Spec for a key the algorithm is known to declare.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not in the table; callers pass keys from their own
    /// static schema.
    pub fn spec(&self, key: &str) -> &ParamSpec {
        self.get(key)
            .unwrap_or_else(|| panic!("{} schema has no parameter '{key}'", self.algorithm))
    }

    /// The default parameter object (the "reset" state).
    pub fn defaults(&self) -> Value {
        let map: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.key.to_string(), p.default_json()))
            .collect();
        Value::Object(map)
    }

    /// Schema as JSON: `{ key: { type, default, min, max, step, description } }`.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                let mut entry = Map::new();
                entry.insert("type".into(), Value::from(p.kind.as_str()));
                entry.insert("default".into(), p.default_json());
                if p.kind != ParamKind::Rule {
                    entry.insert("min".into(), Value::from(p.min));
                    entry.insert("max".into(), Value::from(p.max));
                    entry.insert("step".into(), Value::from(p.step));
                }
                entry.insert("description".into(), Value::from(p.description));
                (p.key.to_string(), Value::Object(entry))
            })
            .collect();
        Value::Object(map)
    }

    /// Checks every known key present in `params` for type and range.
    ///
    /// Missing keys are allowed (they take defaults); unknown keys are ignored.
    pub fn validate(&self, params: &Value) -> Result<(), EngineError> {
        let obj = params.as_object().ok_or_else(|| EngineError::ParamTypeMismatch {
            name: "params".to_string(),
            expected: "object".to_string(),
            got: json_type(params).to_string(),
        })?;
        self.params
            .iter()
            .filter_map(|spec| obj.get(spec.key).map(|v| (spec, v)))
            .try_for_each(|(spec, v)| spec.check(v))
    }
}
