use std::collections::HashMap;

use crate::utils::prelude::SrcSpan;

use super::prelude::{runtime_error, RuntimeError, RuntimeErrorType, Value, ValueType};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInfo {
    pub base: ValueType,
    pub dimensions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub value: Value,
    pub value_type: ValueType,
    pub is_constant: bool,
    pub array_info: Option<ArrayInfo>,
}

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<String, VariableDescriptor>,
}

/// The scope chain of a running program.
///
/// Block execution is strictly nested and a scope never outlives the block
/// that created it, so the parent chain is exactly a stack: the innermost
/// scope is the last element and name resolution walks it back to front.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn exit_scope(&mut self) {
        let scope = self.scopes.pop();
        debug_assert!(
            scope.is_some() && !self.scopes.is_empty(),
            "the global scope outlives every block"
        );
    }

    /// Registers a name in the innermost scope. Shadowing an outer scope is
    /// allowed, redeclaring within the same scope is not. Array variables
    /// eagerly allocate their nested storage with every leaf unset.
    pub fn define(
        &mut self,
        name: &str,
        value_type: ValueType,
        is_constant: bool,
        array_info: Option<ArrayInfo>,
        initial: Value,
        span: SrcSpan,
    ) -> Result<(), RuntimeError> {
        let scope = self.scopes.last_mut().expect("environment always has a scope");

        if scope.values.contains_key(name) {
            return runtime_error(
                RuntimeErrorType::Redeclaration { name: name.to_string() },
                span
            );
        }

        let value = match &array_info {
            Some(info) => allocate_array(&info.dimensions),
            None => initial,
        };

        scope.values.insert(name.to_string(), VariableDescriptor {
            value,
            value_type,
            is_constant,
            array_info,
        });

        Ok(())
    }

    fn resolve(&self, name: &str) -> Option<&VariableDescriptor> {
        self.scopes.iter().rev().find_map(|scope| scope.values.get(name))
    }

    fn resolve_mut(&mut self, name: &str) -> Option<&mut VariableDescriptor> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.values.get_mut(name))
    }

    pub fn descriptor(&self, name: &str, span: SrcSpan) -> Result<&VariableDescriptor, RuntimeError> {
        match self.resolve(name) {
            Some(descriptor) => Ok(descriptor),
            None => runtime_error(
                RuntimeErrorType::UndefinedVariable { name: name.to_string() },
                span
            )
        }
    }

    pub fn get(&self, name: &str, span: SrcSpan) -> Result<Value, RuntimeError> {
        Ok(self.descriptor(name, span)?.value.clone())
    }

    pub fn assign(&mut self, name: &str, value: Value, span: SrcSpan) -> Result<(), RuntimeError> {
        let descriptor = match self.resolve_mut(name) {
            Some(descriptor) => descriptor,
            None => return runtime_error(
                RuntimeErrorType::UndefinedVariable { name: name.to_string() },
                span
            )
        };

        if descriptor.is_constant {
            return runtime_error(
                RuntimeErrorType::ConstantReassignment { name: name.to_string() },
                span
            );
        }

        if descriptor.array_info.is_some() {
            return runtime_error(
                RuntimeErrorType::WholeArrayAssignment { name: name.to_string() },
                span
            );
        }

        if !descriptor.value_type.accepts(&value) {
            return runtime_error(
                RuntimeErrorType::TypeMismatch {
                    name: name.to_string(),
                    expected: descriptor.value_type,
                    got: value.type_name(),
                },
                span
            );
        }

        descriptor.value = value;

        Ok(())
    }

    pub fn get_array_element(
        &self,
        name: &str,
        indices: &[i64],
        span: SrcSpan,
    ) -> Result<Value, RuntimeError> {
        let descriptor = self.descriptor(name, span)?;

        let info = match &descriptor.array_info {
            Some(info) => info,
            None => return runtime_error(
                RuntimeErrorType::NotAnArray { name: name.to_string() },
                span
            )
        };

        if indices.len() != info.dimensions.len() {
            return runtime_error(
                RuntimeErrorType::IndexCountMismatch {
                    name: name.to_string(),
                    expected: info.dimensions.len(),
                    got: indices.len(),
                },
                span
            );
        }

        let mut current = &descriptor.value;

        for &index in indices {
            let items = match current {
                Value::Array(items) => items,
                _ => unreachable!("array storage shallower than its declared shape"),
            };

            if index < 0 || index as usize >= items.len() {
                return runtime_error(
                    RuntimeErrorType::IndexOutOfBounds { name: name.to_string(), index },
                    span
                );
            }

            current = &items[index as usize];
        }

        Ok(current.clone())
    }

    pub fn assign_array_element(
        &mut self,
        name: &str,
        indices: &[i64],
        value: Value,
        span: SrcSpan,
    ) -> Result<(), RuntimeError> {
        let descriptor = match self.resolve_mut(name) {
            Some(descriptor) => descriptor,
            None => return runtime_error(
                RuntimeErrorType::UndefinedVariable { name: name.to_string() },
                span
            )
        };

        let info = match descriptor.array_info.clone() {
            Some(info) => info,
            None => return runtime_error(
                RuntimeErrorType::NotAnArray { name: name.to_string() },
                span
            )
        };

        if descriptor.is_constant {
            return runtime_error(
                RuntimeErrorType::ConstantReassignment { name: name.to_string() },
                span
            );
        }

        if indices.len() != info.dimensions.len() {
            return runtime_error(
                RuntimeErrorType::IndexCountMismatch {
                    name: name.to_string(),
                    expected: info.dimensions.len(),
                    got: indices.len(),
                },
                span
            );
        }

        // element writes type-check against the array's base type
        if !info.base.accepts(&value) {
            return runtime_error(
                RuntimeErrorType::TypeMismatch {
                    name: name.to_string(),
                    expected: info.base,
                    got: value.type_name(),
                },
                span
            );
        }

        let mut current = &mut descriptor.value;

        for &index in indices {
            let items = match current {
                Value::Array(items) => items,
                _ => unreachable!("array storage shallower than its declared shape"),
            };

            if index < 0 || index as usize >= items.len() {
                return runtime_error(
                    RuntimeErrorType::IndexOutOfBounds { name: name.to_string(), index },
                    span
                );
            }

            current = &mut items[index as usize];
        }

        *current = value;

        Ok(())
    }
}

// [2, 3] allocates two rows of three unset leaves each
fn allocate_array(dimensions: &[usize]) -> Value {
    match dimensions.split_first() {
        None => Value::Null,
        Some((&size, rest)) => {
            Value::Array((0..size).map(|_| allocate_array(rest)).collect())
        }
    }
}
