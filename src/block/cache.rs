use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::debug;

use super::expr::ShaderTarget;
use super::params::{BuiltinParamBundles, ParamBundleResolver};
use super::types::GeneratedFragment;
use crate::config::BlockConfig;

type Key = (BlockConfig, ShaderTarget);

/// Thread-safe, clone-friendly memo of generated fragments keyed by
/// (config, target).
///
/// Generation runs outside the lock; when two callers race on the same key the
/// first insert wins and both get equal fragments.
#[derive(Clone)]
pub struct FragmentCache {
    resolver: Arc<dyn ParamBundleResolver + Send + Sync>,
    inner: Arc<Mutex<HashMap<Key, Arc<GeneratedFragment>>>>,
}

impl Default for FragmentCache {
    fn default() -> Self {
        Self::with_resolver(Arc::new(BuiltinParamBundles))
    }
}

impl fmt::Debug for FragmentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: Arc<dyn ParamBundleResolver + Send + Sync>) -> Self {
        Self {
            resolver,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the cached fragment for `config`, generating it on a miss.
    ///
    /// Errors are not cached.
    pub fn get_or_generate(&self, config: &BlockConfig, target: ShaderTarget) -> Result<Arc<GeneratedFragment>> {
        let key = (*config, target);
        if let Some(hit) = self.get(&key) {
            debug!(?config, ?target, "size block cache hit");
            return Ok(hit);
        }

        debug!(?config, ?target, "size block cache miss");
        let fragment = Arc::new(super::generate_fragment(config, target, self.resolver.as_ref())?);

        let Ok(mut map) = self.inner.lock() else {
            return Ok(fragment);
        };
        Ok(map.entry(key).or_insert(fragment).clone())
    }

    fn get(&self, key: &Key) -> Option<Arc<GeneratedFragment>> {
        let map = self.inner.lock().ok()?;
        map.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut map) = self.inner.lock() {
            map.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::types::InputParameterSpec;
    use crate::config::{CompositionMode, RandomMode, SizeMode};
    use std::thread;

    #[test]
    fn test_hit_returns_same_fragment() {
        let cache = FragmentCache::new();
        let cfg = BlockConfig::new(SizeMode::XY, CompositionMode::Blend, RandomMode::Uniform);
        let a = cache.get_or_generate(&cfg, ShaderTarget::Hlsl).unwrap();
        let b = cache.get_or_generate(&cfg, ShaderTarget::Hlsl).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get_or_generate(&cfg, ShaderTarget::Wgsl).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let cache = FragmentCache::new();
        let handles: Vec<_> = BlockConfig::all()
            .into_iter()
            .cycle()
            .take(72)
            .map(|cfg| {
                let cache = cache.clone();
                thread::spawn(move || cache.get_or_generate(&cfg, ShaderTarget::Hlsl).unwrap())
            })
            .collect();
        for h in handles {
            let frag = h.join().unwrap();
            let again = cache.get_or_generate(&frag.config, ShaderTarget::Hlsl).unwrap();
            assert_eq!(*frag, *again);
        }
        assert_eq!(cache.len(), 36);
    }

    struct Empty;

    impl ParamBundleResolver for Empty {
        fn resolve(&self, _size_mode: SizeMode) -> Result<Vec<InputParameterSpec>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = FragmentCache::with_resolver(Arc::new(Empty));
        let cfg = BlockConfig::default();
        assert!(cache.get_or_generate(&cfg, ShaderTarget::Hlsl).is_err());
        assert!(cache.is_empty());
    }
}
