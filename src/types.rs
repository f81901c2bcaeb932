//! Type tags and the structural `extra` payload that compound types carry.
//!
//! Grounded on `examples/original_source/types.hh`'s commented-out `TypeTag`
//! and `Type` sketch, generalized to the closed tag set `spec.md` §3 names
//! (`Sum`/`Union` added on top of the original's `Enum`/`UserDefined`/`Any`).

use std::fmt;
use std::sync::Arc;

/// The closed set of type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Nil,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    List,
    Dict,
    Enum,
    Function,
    Sum,
    Union,
    Any,
    UserDefined,
}

impl TypeTag {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::UInt8
                | TypeTag::UInt16
                | TypeTag::UInt32
                | TypeTag::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeTag::Float32 | TypeTag::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Bit width for integer/float tags; 0 for tags with no fixed width.
    pub fn size_in_bits(self) -> u32 {
        match self {
            TypeTag::Int8 | TypeTag::UInt8 => 8,
            TypeTag::Int16 | TypeTag::UInt16 => 16,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Float32 => 32,
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Float64 => 64,
            _ => 0,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeTag::Nil => "Nil",
            TypeTag::Bool => "Bool",
            TypeTag::Int8 => "Int8",
            TypeTag::Int16 => "Int16",
            TypeTag::Int32 => "Int32",
            TypeTag::Int64 => "Int64",
            TypeTag::UInt8 => "UInt8",
            TypeTag::UInt16 => "UInt16",
            TypeTag::UInt32 => "UInt32",
            TypeTag::UInt64 => "UInt64",
            TypeTag::Float32 => "Float32",
            TypeTag::Float64 => "Float64",
            TypeTag::String => "String",
            TypeTag::List => "List",
            TypeTag::Dict => "Dict",
            TypeTag::Enum => "Enum",
            TypeTag::Function => "Function",
            TypeTag::Sum => "Sum",
            TypeTag::Union => "Union",
            TypeTag::Any => "Any",
            TypeTag::UserDefined => "UserDefined",
        };
        write!(f, "{s}")
    }
}

/// Structural detail for compound types. Scalar tags carry `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExtra {
    List { element: Type },
    Dict { key: Type, value: Type },
    Enum { variants: Vec<String> },
    Function { params: Vec<Type>, ret: Type },
    Sum { variants: Vec<Type> },
    Union { members: Vec<Type> },
    UserDefined { name: String, fields: Vec<(String, Type)> },
}

/// A type: a tag plus optional structural info. Types are reference-counted
/// so sharing one between a declaration site and its uses is cheap, matching
/// the original's "types are interned in practice" note.
#[derive(Debug, Clone)]
pub struct Type {
    pub tag: TypeTag,
    pub extra: Option<Arc<TypeExtra>>,
}

impl Type {
    pub fn simple(tag: TypeTag) -> Self {
        Self { tag, extra: None }
    }

    pub fn list(element: Type) -> Self {
        Self { tag: TypeTag::List, extra: Some(Arc::new(TypeExtra::List { element })) }
    }

    pub fn dict(key: Type, value: Type) -> Self {
        Self { tag: TypeTag::Dict, extra: Some(Arc::new(TypeExtra::Dict { key, value })) }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Self { tag: TypeTag::Function, extra: Some(Arc::new(TypeExtra::Function { params, ret })) }
    }

    pub fn union(members: Vec<Type>) -> Self {
        Self { tag: TypeTag::Union, extra: Some(Arc::new(TypeExtra::Union { members })) }
    }

    pub fn sum(variants: Vec<Type>) -> Self {
        Self { tag: TypeTag::Sum, extra: Some(Arc::new(TypeExtra::Sum { variants })) }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.extra == other.extra
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

/// True iff `value_type`'s tag matches `expected`'s tag and, for compound
/// types, every component recursively matches. `Any` matches everything;
/// `Union` matches if any member matches.
pub fn check_type(value_type: &Type, expected: &Type) -> bool {
    if expected.tag == TypeTag::Any {
        return true;
    }
    if expected.tag == TypeTag::Union {
        if let Some(extra) = &expected.extra {
            if let TypeExtra::Union { members } = extra.as_ref() {
                return members.iter().any(|member| check_type(value_type, member));
            }
        }
    }
    if value_type.tag != expected.tag {
        return false;
    }
    match (&value_type.extra, &expected.extra) {
        (Some(a), Some(b)) => match (a.as_ref(), b.as_ref()) {
            (TypeExtra::List { element: ea }, TypeExtra::List { element: eb }) => {
                check_type(ea, eb)
            }
            (
                TypeExtra::Dict { key: ka, value: va },
                TypeExtra::Dict { key: kb, value: vb },
            ) => check_type(ka, kb) && check_type(va, vb),
            _ => a == b,
        },
        (None, None) => true,
        _ => false,
    }
}

/// True iff `to = Any`, the tags are equal, both are integer tags, both are
/// floating tags, or a documented cross-domain conversion exists.
pub fn is_compatible(from: &Type, to: &Type) -> bool {
    if to.tag == TypeTag::Any || from.tag == to.tag {
        return true;
    }
    if from.tag.is_integer() && to.tag.is_integer() {
        return true;
    }
    if from.tag.is_float() && to.tag.is_float() {
        return true;
    }
    if from.tag.is_numeric() && to.tag.is_float() {
        return true;
    }
    if (from.tag.is_numeric() && to.tag == TypeTag::String)
        || (from.tag == TypeTag::String && to.tag.is_numeric())
    {
        return true;
    }
    if (from.tag == TypeTag::Bool && to.tag == TypeTag::String)
        || (from.tag == TypeTag::String && to.tag == TypeTag::Bool)
    {
        return true;
    }
    false
}

/// Resolve a common type for a binary/comparison operation: `a` if the types
/// are equal, the convertible-to target if one-way compatible, else a
/// `TypeError`.
pub fn get_common_type(a: &Type, b: &Type) -> crate::error::Result<Type> {
    if a == b {
        return Ok(a.clone());
    }
    if is_compatible(b, a) && !is_compatible(a, b) {
        return Ok(a.clone());
    }
    if is_compatible(a, b) {
        // Prefer the wider numeric type when both directions are compatible.
        if a.tag.is_numeric() && b.tag.is_numeric() {
            return Ok(if a.tag.size_in_bits() >= b.tag.size_in_bits() {
                a.clone()
            } else {
                b.clone()
            });
        }
        return Ok(b.clone());
    }
    Err(crate::error::Error::IncompatibleTypes { lhs: a.to_string(), rhs: b.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_types_match() {
        let t = Type::simple(TypeTag::Int32);
        assert!(check_type(&t, &t.clone()));
    }

    #[test]
    fn any_matches_everything() {
        let any = Type::simple(TypeTag::Any);
        assert!(check_type(&Type::simple(TypeTag::String), &any));
    }

    #[test]
    fn union_matches_any_member() {
        let union = Type::union(vec![Type::simple(TypeTag::Int32), Type::simple(TypeTag::String)]);
        assert!(check_type(&Type::simple(TypeTag::String), &union));
        assert!(!check_type(&Type::simple(TypeTag::Bool), &union));
    }

    #[test]
    fn list_types_match_recursively() {
        let list_int = Type::list(Type::simple(TypeTag::Int32));
        let list_str = Type::list(Type::simple(TypeTag::String));
        assert!(check_type(&list_int, &Type::list(Type::simple(TypeTag::Int32))));
        assert!(!check_type(&list_int, &list_str));
    }

    #[test]
    fn common_type_widens_integers() {
        let a = Type::simple(TypeTag::Int8);
        let b = Type::simple(TypeTag::Int64);
        assert_eq!(get_common_type(&a, &b).unwrap().tag, TypeTag::Int64);
    }

    #[test]
    fn common_type_rejects_incompatible() {
        let a = Type::simple(TypeTag::Bool);
        let b = Type::simple(TypeTag::List);
        assert!(get_common_type(&a, &b).is_err());
    }
}
