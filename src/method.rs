use crate::value::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a method inside a dispatch table: name plus parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodKey {
    pub name: String,
    pub parameter_types: Vec<TypeDescriptor>,
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ")")
    }
}

/// Describes a method that can be invoked on a mocked capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
    #[serde(default)]
    pub generic_arguments: Vec<TypeDescriptor>,
    /// Abstract members have no implementation to delegate to.
    #[serde(default)]
    pub is_abstract: bool,
}

impl MethodDescriptor {
    /// A concrete, non-generic method with no parameters.
    pub fn new(name: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type,
            generic_arguments: Vec::new(),
            is_abstract: false,
        }
    }

    pub fn with_parameters(mut self, parameter_types: Vec<TypeDescriptor>) -> Self {
        self.parameter_types = parameter_types;
        self
    }

    pub fn with_generic_arguments(mut self, generic_arguments: Vec<TypeDescriptor>) -> Self {
        self.generic_arguments = generic_arguments;
        self
    }

    pub fn abstract_member(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            name: self.name.clone(),
            parameter_types: self.parameter_types.clone(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.return_type, self.name)?;
        if !self.generic_arguments.is_empty() {
            let generics: Vec<String> = self
                .generic_arguments
                .iter()
                .map(ToString::to_string)
                .collect();
            write!(f, "<{}>", generics.join(", "))?;
        }
        let params: Vec<String> = self
            .parameter_types
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(f, "({})", params.join(", "))
    }
}

/// The declared type being mocked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyType {
    pub name: String,
}

impl ProxyType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
