//! Session-scoped kernel cache.
//!
//! Maps [`OperationKey`]s to compiled kernels. Uses papaya's lock-free HashMap
//! for thread-safe access when a runtime session is shared between threads.
//!
//! # Thread Safety
//!
//! Each key owns a once-cell. The first caller to miss on a key compiles while
//! concurrent callers for the same key block on that cell, so a key is compiled
//! exactly once even under contention. Misses on different keys compile in
//! parallel.
//!
//! # Lifetime
//!
//! Entries are never evicted or replaced: a key goes from uncompiled to compiled
//! once and stays compiled until the cache is dropped with its session. A failed
//! compilation leaves the key uncompiled.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use papaya::HashMap;
use spindle_codegen::KernelTemplate;
use spindle_device::Program;

use crate::OperationKey;

/// Compiled kernel shared by every call with the same key.
pub struct CachedKernel {
    /// The compiled, launchable program.
    pub program: Box<dyn Program>,
    /// Key the kernel was compiled under.
    pub key: OperationKey,
    /// What the kernel computes.
    pub template: KernelTemplate,
    /// Entry point name.
    pub entry_point: String,
    /// Generated source code (for debugging/profiling).
    pub code: String,
}

impl std::fmt::Debug for CachedKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedKernel")
            .field("key", &self.key)
            .field("template", &self.template)
            .field("entry_point", &self.entry_point)
            .finish_non_exhaustive()
    }
}

type Slot = Arc<OnceCell<Arc<CachedKernel>>>;

/// Get-or-compile kernel cache owned by a runtime session.
#[derive(Default)]
pub struct KernelCache {
    kernels: HashMap<OperationKey, Slot>,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a compiled kernel.
    pub fn get(&self, key: &OperationKey) -> Option<Arc<CachedKernel>> {
        let guard = self.kernels.guard();
        self.kernels.get(key, &guard).and_then(|slot| slot.get()).map(Arc::clone)
    }

    /// Get a kernel, compiling it with `compile_fn` if the key is uncompiled.
    ///
    /// Thread-safe: if multiple threads call this with the same key concurrently,
    /// exactly one runs `compile_fn` and all of them receive the same kernel.
    ///
    /// # Errors
    ///
    /// Returns the error of `compile_fn`; the key stays uncompiled and the next
    /// call retries compilation.
    pub fn get_or_compile<F, E>(&self, key: &OperationKey, compile_fn: F) -> Result<Arc<CachedKernel>, E>
    where
        F: FnOnce() -> Result<CachedKernel, E>,
    {
        let slot = {
            let guard = self.kernels.guard();

            // Fast path: kernel already compiled
            if let Some(slot) = self.kernels.get(key, &guard)
                && let Some(cached) = slot.get()
            {
                return Ok(Arc::clone(cached));
            }

            Arc::clone(self.kernels.get_or_insert_with(key.clone(), || Arc::new(OnceCell::new()), &guard))
        };

        // Slow path: compile outside the map guard; racing callers wait on the cell
        slot.get_or_try_init(|| compile_fn().map(Arc::new)).map(Arc::clone)
    }

    /// Whether `key` has a compiled kernel.
    pub fn contains(&self, key: &OperationKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of compiled kernels.
    pub fn len(&self) -> usize {
        let guard = self.kernels.guard();
        self.kernels.iter(&guard).filter(|(_, slot)| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted keys of all compiled kernels.
    pub fn keys(&self) -> Vec<OperationKey> {
        let guard = self.kernels.guard();
        let mut keys: Vec<_> =
            self.kernels.iter(&guard).filter(|(_, slot)| slot.get().is_some()).map(|(key, _)| key.clone()).collect();
        keys.sort();
        keys
    }
}
