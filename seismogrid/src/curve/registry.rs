//! Vulnerability model registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::discrete::CurveError;
use super::vulnerability::VulnerabilityFunction;

/// Registry of vulnerability functions indexed by their identifiers.
///
/// Built once at wiring time and passed by reference to the filters that
/// need it; registration order has no effect on lookups.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityRegistry {
    models: HashMap<String, Arc<VulnerabilityFunction>>,
}

impl VulnerabilityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under its identifier, replacing any previous
    /// registration for the same identifier.
    pub fn register(&mut self, function: VulnerabilityFunction) -> Result<(), CurveError> {
        if function.identifier().is_empty() {
            return Err(CurveError::EmptyModelId);
        }
        self.models
            .insert(function.identifier().to_string(), Arc::new(function));
        Ok(())
    }

    /// Looks up a function by identifier.
    pub fn lookup(&self, identifier: &str) -> Result<Arc<VulnerabilityFunction>, CurveError> {
        self.models
            .get(identifier)
            .cloned()
            .ok_or_else(|| CurveError::UnknownModel(identifier.to_string()))
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered models.
    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(identifier: &str, first_ratio: f64) -> VulnerabilityFunction {
        VulnerabilityFunction::new(
            identifier,
            "PGA",
            &[0.1, 0.2],
            &[first_ratio, 0.5],
            &[0.2, 0.2],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_returns_registered_model() {
        let mut registry = VulnerabilityRegistry::new();
        registry.register(model("masonry", 0.1)).unwrap();

        let found = registry.lookup("masonry").unwrap();
        assert_eq!(found.identifier(), "masonry");
    }

    #[test]
    fn test_lookup_unknown_model_is_an_error() {
        let registry = VulnerabilityRegistry::new();
        assert!(matches!(
            registry.lookup("adobe"),
            Err(CurveError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_register_replaces_same_identifier() {
        let mut registry = VulnerabilityRegistry::new();
        registry.register(model("masonry", 0.1)).unwrap();
        registry.register(model("masonry", 0.3)).unwrap();

        assert_eq!(registry.len(), 1);
        let found = registry.lookup("masonry").unwrap();
        assert_eq!(found.mean_at(0.1).unwrap(), 0.3);
    }

    #[test]
    fn test_identifiers_are_sorted() {
        let mut registry = VulnerabilityRegistry::new();
        registry.register(model("wood", 0.1)).unwrap();
        registry.register(model("adobe", 0.1)).unwrap();
        registry.register(model("masonry", 0.1)).unwrap();

        assert_eq!(registry.identifiers(), vec!["adobe", "masonry", "wood"]);
    }
}
