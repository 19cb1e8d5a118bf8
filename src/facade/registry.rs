//! Name-based dispatch over a backend.
//!
//! `FunctionRegistry` maps every exported name to its arity and a dispatch
//! function that unpacks dynamically typed `Value` arguments. It lets callers
//! that only have a name and loosely typed data (JSON, FFI layers) reach the same
//! operations as the typed API.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Number};
use crate::error::DemopyError;

/// The exported function names, identical for every backend.
pub const EXPORTS: [&str; 6] = [
    "hello",
    "add",
    "multiply",
    "sum_list",
    "reverse_string",
    "power",
];

//==================================================================================
// 1. Dynamic Values
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::IntList(_) => "list[int]",
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(v) => Value::Int(v),
            Number::Float(v) => Value::Float(v),
        }
    }
}

//==================================================================================
// 2. Argument Extraction
//==================================================================================

fn mismatch(name: &'static str, index: usize, expected: &'static str, got: &Value) -> DemopyError {
    DemopyError::TypeMismatch {
        name,
        index,
        expected,
        got: got.type_name(),
    }
}

fn int_arg(name: &'static str, args: &[Value], index: usize) -> Result<i64, DemopyError> {
    match &args[index] {
        Value::Int(v) => Ok(*v),
        other => Err(mismatch(name, index, "int", other)),
    }
}

/// Ints are accepted where a float is expected.
fn float_arg(name: &'static str, args: &[Value], index: usize) -> Result<f64, DemopyError> {
    match &args[index] {
        Value::Float(v) => Ok(*v),
        Value::Int(v) => Ok(*v as f64),
        other => Err(mismatch(name, index, "float", other)),
    }
}

fn str_arg<'a>(name: &'static str, args: &'a [Value], index: usize) -> Result<&'a str, DemopyError> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        other => Err(mismatch(name, index, "str", other)),
    }
}

fn int_list_arg<'a>(
    name: &'static str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a [i64], DemopyError> {
    match &args[index] {
        Value::IntList(v) => Ok(v),
        other => Err(mismatch(name, index, "list[int]", other)),
    }
}

//==================================================================================
// 3. The Registry
//==================================================================================

type Dispatch = fn(&dyn Backend, &[Value]) -> Result<Value, DemopyError>;

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    arity: usize,
    call: Dispatch,
}

pub struct FunctionRegistry {
    entries: HashMap<&'static str, Entry>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let table: [Entry; 6] = [
            Entry {
                name: "hello",
                arity: 0,
                call: |b, _| Ok(Value::Str(b.hello())),
            },
            Entry {
                name: "add",
                arity: 2,
                call: |b, args| {
                    let (x, y) = (int_arg("add", args, 0)?, int_arg("add", args, 1)?);
                    b.add(x, y).map(Value::Int)
                },
            },
            Entry {
                name: "multiply",
                arity: 2,
                call: |b, args| {
                    let (x, y) = (float_arg("multiply", args, 0)?, float_arg("multiply", args, 1)?);
                    Ok(Value::Float(b.multiply(x, y)))
                },
            },
            Entry {
                name: "sum_list",
                arity: 1,
                call: |b, args| b.sum_list(int_list_arg("sum_list", args, 0)?).map(Value::Int),
            },
            Entry {
                name: "reverse_string",
                arity: 1,
                call: |b, args| {
                    b.reverse_string(str_arg("reverse_string", args, 0)?)
                        .map(Value::Str)
                },
            },
            Entry {
                name: "power",
                arity: 2,
                call: |b, args| {
                    let (base, exp) = (int_arg("power", args, 0)?, int_arg("power", args, 1)?);
                    b.power(base, exp).map(Value::from)
                },
            },
        ];

        let entries = table.into_iter().map(|e| (e.name, e)).collect();
        Self { entries }
    }

    /// The registered names, in export order.
    pub fn names(&self) -> Vec<&'static str> {
        EXPORTS
            .iter()
            .copied()
            .filter(|name| self.entries.contains_key(name))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.entries.get(name).map(|e| e.arity)
    }

    /// Calls `name` on `backend` with positional `args`.
    pub fn invoke(
        &self,
        backend: &dyn Backend,
        name: &str,
        args: &[Value],
    ) -> Result<Value, DemopyError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DemopyError::UnknownFunction(name.to_string()))?;
        if args.len() != entry.arity {
            return Err(DemopyError::Arity {
                name: entry.name,
                expected: entry.arity,
                got: args.len(),
            });
        }
        (entry.call)(backend, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FallbackBackend;

    #[test]
    fn test_registry_covers_every_export() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.names(), EXPORTS.to_vec());
        assert_eq!(registry.arity("hello"), Some(0));
        assert_eq!(registry.arity("power"), Some(2));
        assert!(!registry.contains("divide"));
    }

    #[test]
    fn test_invoke_dispatches_with_coercion() {
        let registry = FunctionRegistry::new();
        let b = FallbackBackend::new();
        assert_eq!(
            registry.invoke(&b, "add", &[Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            registry
                .invoke(&b, "multiply", &[Value::Int(2), Value::Float(1.5)])
                .unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            registry.invoke(&b, "power", &[Value::Int(2), Value::Int(-1)]).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_invoke_reports_contract_violations() {
        let registry = FunctionRegistry::new();
        let b = FallbackBackend::new();

        let err = registry.invoke(&b, "divide", &[]).unwrap_err();
        assert!(matches!(err, DemopyError::UnknownFunction(_)));

        let err = registry.invoke(&b, "add", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            DemopyError::Arity {
                name: "add",
                expected: 2,
                got: 1
            }
        ));

        let err = registry
            .invoke(&b, "reverse_string", &[Value::Int(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            DemopyError::TypeMismatch {
                index: 0,
                expected: "str",
                got: "int",
                ..
            }
        ));
    }

    #[test]
    fn test_values_deserialize_from_json() {
        let args: Vec<Value> = serde_json::from_str(r#"[[1, 2, 3], "abc", 4, 2.5]"#).unwrap();
        assert_eq!(
            args,
            vec![
                Value::IntList(vec![1, 2, 3]),
                Value::Str("abc".to_string()),
                Value::Int(4),
                Value::Float(2.5),
            ]
        );
    }
}
