//! The tagged runtime `Value` and its conversion rules.
//!
//! Grounded on `litter::value::PyValue`'s tagged-enum shape (`type_name`,
//! `is_truthy`, `as_*` accessors) generalized to the fixed-width numeric
//! ladder and compound payloads `spec.md` §3 names, plus `convert`/
//! `get_common_type` built from `types.rs` and the overflow/conversion rules
//! in §4.3.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::types::{Type, TypeTag};

/// Ordered sequence of Values.
pub type ListValue = Vec<Value>;

/// Ordered mapping from Value to Value, compared by Value equality. A
/// `BTreeMap` keyed by the value's canonical print form gives deterministic
/// iteration order without requiring `Value: Hash`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DictValue {
    entries: BTreeMap<String, (Value, Value)>,
}

impl DictValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        self.entries.insert(key.canonical_key(), (key, value));
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(&key.canonical_key()).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(k, v)| (k, v))
    }
}

/// A sum-type payload: which variant, plus that variant's value.
#[derive(Debug, Clone, PartialEq)]
pub struct SumValue {
    pub variant: usize,
    pub payload: Box<Value>,
}

/// A user-defined record: variant name plus field name → Value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserDefinedValue {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

/// The runtime value: a type tag together with a payload matching it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    List(ListValue),
    Dict(DictValue),
    Sum(SumValue),
    UserDefined(UserDefinedValue),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int8(_) => TypeTag::Int8,
            Value::Int16(_) => TypeTag::Int16,
            Value::Int32(_) => TypeTag::Int32,
            Value::Int64(_) => TypeTag::Int64,
            Value::UInt8(_) => TypeTag::UInt8,
            Value::UInt16(_) => TypeTag::UInt16,
            Value::UInt32(_) => TypeTag::UInt32,
            Value::UInt64(_) => TypeTag::UInt64,
            Value::Float32(_) => TypeTag::Float32,
            Value::Float64(_) => TypeTag::Float64,
            Value::String(_) => TypeTag::String,
            Value::List(_) => TypeTag::List,
            Value::Dict(_) => TypeTag::Dict,
            Value::Sum(_) => TypeTag::Sum,
            Value::UserDefined(_) => TypeTag::UserDefined,
        }
    }

    pub fn runtime_type(&self) -> Type {
        Type::simple(self.type_tag())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int8(i) => *i != 0,
            Value::Int16(i) => *i != 0,
            Value::Int32(i) => *i != 0,
            Value::Int64(i) => *i != 0,
            Value::UInt8(i) => *i != 0,
            Value::UInt16(i) => *i != 0,
            Value::UInt32(i) => *i != 0,
            Value::UInt64(i) => *i != 0,
            Value::Float32(f) => *f != 0.0,
            Value::Float64(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Sum(_) | Value::UserDefined(_) => true,
        }
    }

    /// The type-appropriate zero value used to initialize a declared slot
    /// that has no initializer (`DECLARE_VARIABLE` without a `STORE`).
    pub fn zero_value(tag: TypeTag) -> Value {
        match tag {
            TypeTag::Nil => Value::Nil,
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Int8 => Value::Int8(0),
            TypeTag::Int16 => Value::Int16(0),
            TypeTag::Int32 => Value::Int32(0),
            TypeTag::Int64 => Value::Int64(0),
            TypeTag::UInt8 => Value::UInt8(0),
            TypeTag::UInt16 => Value::UInt16(0),
            TypeTag::UInt32 => Value::UInt32(0),
            TypeTag::UInt64 => Value::UInt64(0),
            TypeTag::Float32 => Value::Float32(0.0),
            TypeTag::Float64 => Value::Float64(0.0),
            TypeTag::String => Value::String(String::new()),
            TypeTag::List => Value::List(Vec::new()),
            TypeTag::Dict => Value::Dict(DictValue::new()),
            _ => Value::Nil,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Bool(b) => Some(*b as i128),
            Value::Int8(i) => Some(*i as i128),
            Value::Int16(i) => Some(*i as i128),
            Value::Int32(i) => Some(*i as i128),
            Value::Int64(i) => Some(*i as i128),
            Value::UInt8(i) => Some(*i as i128),
            Value::UInt16(i) => Some(*i as i128),
            Value::UInt32(i) => Some(*i as i128),
            Value::UInt64(i) => Some(*i as i128),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(f) => Some(*f as f64),
            Value::Float64(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.as_i128().map(|i| i as f64),
        }
    }

    /// The canonical decimal representation used both by `PRINT` and by
    /// number→string conversion.
    pub fn canonical_key(&self) -> String {
        match self {
            Value::Nil => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int8(i) => i.to_string(),
            Value::Int16(i) => i.to_string(),
            Value::Int32(i) => i.to_string(),
            Value::Int64(i) => i.to_string(),
            Value::UInt8(i) => i.to_string(),
            Value::UInt16(i) => i.to_string(),
            Value::UInt32(i) => i.to_string(),
            Value::UInt64(i) => i.to_string(),
            Value::Float32(f) => format_canonical_float(*f as f64),
            Value::Float64(f) => format_canonical_float(*f),
            Value::String(s) => s.clone(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::print_form).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Dict(dict) => {
                let parts: Vec<String> = dict
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.print_form(), v.print_form()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Sum(sum) => format!("{}#{}", sum.variant, sum.payload.print_form()),
            Value::UserDefined(record) => record.name.clone(),
        }
    }

    /// Type-aware `PRINT` formatting: lists as `[a, b]`, dicts as `{k: v}`,
    /// booleans as `true`/`false`, nil as `null`.
    pub fn print_form(&self) -> String {
        self.canonical_key()
    }

    /// Convert this value to type `to`, using overflow-checked casts for
    /// integer targets and canonical decimal text for number↔string.
    pub fn convert(&self, to: &Type) -> Result<Value> {
        use TypeTag::*;
        if self.type_tag() == to.tag {
            return Ok(self.clone());
        }
        match to.tag {
            Bool => Ok(Value::Bool(self.is_truthy())),
            Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64 => {
                self.convert_to_integer(to.tag)
            }
            Float32 => Ok(Value::Float32(self.to_float()? as f32)),
            Float64 => Ok(Value::Float64(self.to_float()?)),
            String => Ok(Value::String(self.print_form())),
            _ => Err(Error::ConversionNotPermitted {
                from: self.type_tag().to_string(),
                to: to.tag.to_string(),
            }),
        }
    }

    fn to_float(&self) -> Result<f64> {
        if let Some(f) = self.as_f64() {
            return Ok(f);
        }
        if let Value::String(s) = self {
            return s.trim().parse::<f64>().map_err(|_| Error::MalformedNumericLiteral(
                s.clone(),
                "Float64".to_string(),
            ));
        }
        Err(Error::ConversionNotPermitted {
            from: self.type_tag().to_string(),
            to: "Float64".to_string(),
        })
    }

    fn convert_to_integer(&self, target: TypeTag) -> Result<Value> {
        let raw: i128 = if let Some(i) = self.as_i128() {
            i
        } else if let Some(f) = match self {
            Value::Float32(f) => Some(*f as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        } {
            f as i128
        } else if let Value::String(s) = self {
            s.trim()
                .parse::<i128>()
                .map_err(|_| Error::MalformedNumericLiteral(s.clone(), target.to_string()))?
        } else {
            return Err(Error::ConversionNotPermitted {
                from: self.type_tag().to_string(),
                to: target.to_string(),
            });
        };
        safe_cast_integer(raw, target)
    }
}

fn safe_cast_integer(value: i128, target: TypeTag) -> Result<Value> {
    macro_rules! cast {
        ($ty:ty, $variant:ident) => {{
            let narrowed = value as $ty;
            if narrowed as i128 != value {
                return Err(Error::IntegerOverflow {
                    value: value.to_string(),
                    target: target.to_string(),
                });
            }
            Ok(Value::$variant(narrowed))
        }};
    }
    match target {
        TypeTag::Int8 => cast!(i8, Int8),
        TypeTag::Int16 => cast!(i16, Int16),
        TypeTag::Int32 => cast!(i32, Int32),
        TypeTag::Int64 => cast!(i64, Int64),
        TypeTag::UInt8 => cast!(u8, UInt8),
        TypeTag::UInt16 => cast!(u16, UInt16),
        TypeTag::UInt32 => cast!(u32, UInt32),
        TypeTag::UInt64 => cast!(u64, UInt64),
        _ => unreachable!("safe_cast_integer called with a non-integer target"),
    }
}

/// Canonical decimal text for a float: shortest round-tripping form, with a
/// trailing `.0` for whole numbers so `1.0` never prints as `1`.
fn format_canonical_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print_form())
    }
}
