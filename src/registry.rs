//! Explicit name-to-target registry built by the host before running a suite.

use crate::fault::Fault;
use crate::value::{TrialInputs, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// The invocable unit a case name resolves to.
///
/// Targets receive the generated named arguments and either return a value or
/// raise a fault. Panics inside a target are also captured by the executor,
/// so plain `panic!`-ing code can be put under test unchanged.
pub type TargetFn = Arc<dyn Fn(&TrialInputs) -> Result<Value, Fault> + Send + Sync>;

/// Registry of functions under test, keyed by the `function_name` that case
/// declarations reference.
#[derive(Default, Clone)]
pub struct TargetRegistry {
    targets: HashMap<String, TargetFn>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, target: F)
    where
        F: Fn(&TrialInputs) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        self.targets.insert(name.into(), Arc::new(target));
    }

    /// Resolve a declared `function_name`.
    pub fn get(&self, name: &str) -> Option<&TargetFn> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TargetFn)> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}
