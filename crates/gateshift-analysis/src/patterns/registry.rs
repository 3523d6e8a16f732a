//! Hot-reloadable holder of the active compiled pattern snapshot.
//!
//! Readers take an `Arc` of the current snapshot; a reload compiles a new
//! snapshot off to the side and swaps it in with a single pointer store. A
//! rejected load leaves the current snapshot untouched.

use std::path::Path;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use gateshift_core::errors::ConfigLoadError;

use super::compiled::CompiledPatterns;
use super::config::{ConfigFormat, PatternConfig};

struct RegistryInner {
    current: ArcSwap<CompiledPatterns>,
    /// Sequences writers so generations are stored in increasing order.
    reload_lock: Mutex<()>,
}

/// Shared handle to the active pattern configuration. Cheap to clone.
#[derive(Clone)]
pub struct PatternRegistry {
    inner: Arc<RegistryInner>,
}

impl PatternRegistry {
    /// Registry seeded with the built-in pattern table.
    pub fn builtin() -> Result<Self, ConfigLoadError> {
        Self::from_config(PatternConfig::builtin())
    }

    pub fn from_config(config: PatternConfig) -> Result<Self, ConfigLoadError> {
        let compiled = CompiledPatterns::compile(config, 1)?;
        Ok(Self {
            inner: Arc::new(RegistryInner {
                current: ArcSwap::from_pointee(compiled),
                reload_lock: Mutex::new(()),
            }),
        })
    }

    /// The snapshot every in-flight call should use from start to finish.
    pub fn snapshot(&self) -> Arc<CompiledPatterns> {
        self.inner.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.inner.current.load().generation()
    }

    /// Replace the whole pattern table. Returns the new generation.
    pub fn update(&self, config: PatternConfig) -> Result<u64, ConfigLoadError> {
        let _guard = self
            .inner
            .reload_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = self.inner.current.load().generation();
        match CompiledPatterns::compile(config, previous + 1) {
            Ok(compiled) => {
                let generation = compiled.generation();
                let templates = compiled.template_count();
                self.inner.current.store(Arc::new(compiled));
                tracing::info!(generation, templates, "pattern config activated");
                Ok(generation)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    active_generation = previous,
                    "pattern config rejected; keeping active config"
                );
                Err(e)
            }
        }
    }

    /// Parse `content` in `format` and activate it.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> Result<u64, ConfigLoadError> {
        let config = PatternConfig::parse(content, format).inspect_err(|e| {
            tracing::warn!(error = %e, "pattern config could not be parsed; keeping active config");
        })?;
        self.update(config)
    }

    /// Load a pattern file (`.json`, `.yaml`, `.yml`) and activate it.
    pub fn load_from_file(&self, path: &Path) -> Result<u64, ConfigLoadError> {
        let config = PatternConfig::from_file(path).inspect_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "pattern file could not be loaded; keeping active config"
            );
        })?;
        self.update(config)
    }
}

impl std::fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_bumps_generation() {
        let registry = PatternRegistry::builtin().unwrap();
        assert_eq!(registry.generation(), 1);
        let gen = registry.update(PatternConfig::builtin()).unwrap();
        assert_eq!(gen, 2);
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn rejected_update_keeps_previous_snapshot() {
        let registry = PatternRegistry::builtin().unwrap();
        let before = registry.snapshot();

        let mut bad = PatternConfig::builtin();
        bad.converge.credential_fields = vec!["ssl_[".to_string()];
        assert!(registry.update(bad).is_err());

        let after = registry.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(registry.generation(), 1);
    }

    #[test]
    fn held_snapshot_survives_reload() {
        let registry = PatternRegistry::builtin().unwrap();
        let held = registry.snapshot();

        let mut narrowed = PatternConfig::builtin();
        narrowed.converge.credential_fields = vec![r"\bssl_pin\b".to_string()];
        registry.update(narrowed).unwrap();

        assert_eq!(held.generation(), 1);
        assert_eq!(held.config(), &PatternConfig::builtin());
        assert_eq!(registry.snapshot().generation(), 2);
    }
}
