//! Predicates over pipe contents.
//!
//! A specification decides, from the pipe alone, whether a conditional
//! filter's delegate should run for the current cell. Specifications
//! never mutate the pipe and never touch the buffer.

use crate::pipe::Pipe;

/// A predicate over one cell's pipe.
pub trait Specification: Send + Sync {
    /// Name used in skip logs.
    fn name(&self) -> &str;

    fn satisfied_by(&self, pipe: &Pipe) -> bool;
}

/// Satisfied by every pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl Specification for AlwaysTrue {
    fn name(&self) -> &str {
        "always-true"
    }

    fn satisfied_by(&self, _pipe: &Pipe) -> bool {
        true
    }
}

/// Satisfied by no pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFalse;

impl Specification for AlwaysFalse {
    fn name(&self) -> &str {
        "always-false"
    }

    fn satisfied_by(&self, _pipe: &Pipe) -> bool {
        false
    }
}

/// Satisfied when the pipe holds a value under the key, whatever its
/// type. Loaders that found nothing leave the key absent, so this is
/// how downstream filters skip cells with no data.
#[derive(Debug, Clone)]
pub struct IsDataComputable {
    key: String,
}

impl IsDataComputable {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Specification for IsDataComputable {
    fn name(&self) -> &str {
        "is-data-computable"
    }

    fn satisfied_by(&self, pipe: &Pipe) -> bool {
        pipe.contains(&self.key)
    }
}

/// Conjunction of child specifications. An empty conjunction is
/// satisfied; evaluation short-circuits left to right.
#[derive(Default)]
pub struct And {
    children: Vec<Box<dyn Specification>>,
}

impl And {
    pub fn new(children: Vec<Box<dyn Specification>>) -> Self {
        Self { children }
    }

    /// Builder-style append.
    pub fn with(mut self, child: impl Specification + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }
}

impl Specification for And {
    fn name(&self) -> &str {
        "and"
    }

    fn satisfied_by(&self, pipe: &Pipe) -> bool {
        self.children.iter().all(|child| child.satisfied_by(pipe))
    }
}
