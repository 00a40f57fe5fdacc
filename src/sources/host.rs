//! Capability probe for optionally present explorer plugins.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of plugin integration surfaces exposed by the editor host.
///
/// Explorer plugins are optional and independently versioned, so nothing here
/// is a required interface: the host registers whichever surfaces are loaded
/// and adapters probe for theirs with [`get`](PluginHost::get). A miss means
/// the plugin is not installed, which is not an error.
#[derive(Default)]
pub struct PluginHost {
    plugins: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a plugin surface to adapters. Re-registering the same type
    /// replaces the previous surface.
    pub fn register<T: Any + Send + Sync>(&mut self, plugin: Arc<T>) {
        self.plugins.insert(TypeId::of::<T>(), plugin);
    }

    /// Probe for a plugin surface by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.plugins
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|plugin| plugin.downcast::<T>().ok())
    }

    /// Number of registered plugin surfaces.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSurface {
        id: u32,
    }

    #[test]
    fn test_probe_hit_and_miss() {
        let mut host = PluginHost::new();
        host.register(Arc::new(FakeSurface { id: 7 }));

        let surface = host.get::<FakeSurface>().unwrap();
        assert_eq!(surface.id, 7);

        // A type that was never registered probes as absent.
        struct OtherSurface;
        assert!(host.get::<OtherSurface>().is_none());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut host = PluginHost::new();
        host.register(Arc::new(FakeSurface { id: 1 }));
        host.register(Arc::new(FakeSurface { id: 2 }));

        assert_eq!(host.plugin_count(), 1);
        assert_eq!(host.get::<FakeSurface>().unwrap().id, 2);
    }
}
