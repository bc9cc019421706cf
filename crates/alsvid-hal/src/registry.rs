//! Device registry.
//!
//! The [`DeviceRegistry`] is an explicit, enumerable registry populated at
//! startup by an initialization routine. The set of available devices is
//! statically knowable; nothing registers itself as an import side effect.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::device::Device;
use crate::error::{HalError, HalResult};

/// Central registry for execution devices, keyed by name.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: FxHashMap<String, Arc<dyn Device>>,
}

impl DeviceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            devices: FxHashMap::default(),
        }
    }

    /// Register a device instance.
    ///
    /// Registering another device under the same name replaces the previous
    /// entry.
    pub fn register(&mut self, device: Arc<dyn Device>) {
        let name = device.name().to_string();
        debug!("Registering device: {}", name);
        self.devices.insert(name, device);
    }

    /// Look up a device by name.
    ///
    /// Unknown names fail fast with [`HalError::DeviceNotFound`].
    pub fn get(&self, name: &str) -> HalResult<Arc<dyn Device>> {
        self.devices
            .get(name)
            .cloned()
            .ok_or_else(|| HalError::DeviceNotFound(name.to_string()))
    }

    /// List all registered device names, sorted.
    pub fn device_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.devices.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a device is registered under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// Get the number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CompiledCircuit;
    use crate::result::{Counts, ExecutionResult};
    use async_trait::async_trait;

    struct NamedDevice(&'static str);

    #[async_trait]
    impl Device for NamedDevice {
        fn name(&self) -> &str {
            self.0
        }

        fn max_qubits(&self) -> u32 {
            4
        }

        async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
            Ok(CompiledCircuit::new(self.0, source))
        }

        async fn run(&self, _compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::new(), 0))
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = DeviceRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("sim"));
        assert!(registry.device_names().is_empty());
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = DeviceRegistry::new();
        registry.register(Arc::new(NamedDevice("sim")));

        assert!(registry.contains("sim"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("sim").unwrap().name(), "sim");
    }

    #[test]
    fn test_unknown_device_fails_fast() {
        let registry = DeviceRegistry::new();
        assert!(matches!(
            registry.get("nonexistent"),
            Err(HalError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_device_names_sorted() {
        let mut registry = DeviceRegistry::new();
        registry.register(Arc::new(NamedDevice("zephyr")));
        registry.register(Arc::new(NamedDevice("aurora")));

        assert_eq!(registry.device_names(), vec!["aurora", "zephyr"]);
    }
}
