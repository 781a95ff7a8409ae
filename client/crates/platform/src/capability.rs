//! Lazily loaded capabilities
//!
//! Heavy optional pieces (math rendering support, the icon set) are loaded on
//! first use rather than at start-up. Each one is an explicit service object
//! with init-once semantics and a `reset` so tests can start from scratch.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// Boxed error returned by loaders
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Init-once capability
// ============================================================================

/// Something that must be prepared once before use
#[trait_variant::make(CapabilityLoader: Send)]
pub trait LocalCapabilityLoader {
    /// Human readable name, for logs
    fn name(&self) -> &str;

    async fn load(&self) -> Result<(), LoadError>;
}

/// Runs a [`CapabilityLoader`] at most once successfully
///
/// Concurrent callers of [`LoadOnce::ensure_loaded`] wait for the same load.
/// A failed load is logged and leaves the capability unloaded, so the next
/// call tries again.
#[derive(Debug)]
pub struct LoadOnce<L> {
    loader: L,
    loaded: AtomicBool,
    gate: tokio::sync::Mutex<()>,
}

impl<L> LoadOnce<L>
where
    L: CapabilityLoader + Sync,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: AtomicBool::new(false),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Load if needed; `true` once the capability is ready
    pub async fn ensure_loaded(&self) -> bool {
        if self.is_loaded() {
            return true;
        }

        let _guard = self.gate.lock().await;
        if self.is_loaded() {
            return true;
        }

        match self.loader.load().await {
            Ok(()) => {
                self.loaded.store(true, Ordering::Release);
                tracing::debug!(capability = self.loader.name(), "Capability loaded");
                true
            }
            Err(e) => {
                tracing::error!(
                    capability = self.loader.name(),
                    error = %e,
                    "Failed to load capability"
                );
                false
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.loaded.store(false, Ordering::Release);
    }
}

// ============================================================================
// Icons
// ============================================================================

/// Icons preloaded by the tool pages
pub const COMMON_ICONS: &[&str] = &[
    "CopyDocument",
    "ArrowRight",
    "ArrowLeft",
    "Key",
    "Switch",
    "Sunny",
    "Moon",
    "DocumentCopy",
    "Sort",
    "Filter",
    "Refresh",
    "VideoPause",
    "VideoPlay",
    "Clock",
    "Timer",
    "Calendar",
    "Document",
];

/// A loaded icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub name: String,
    pub svg: String,
}

/// Where icons come from
#[trait_variant::make(IconSource: Send)]
pub trait LocalIconSource {
    /// `Ok(None)` when the source has no icon by that name
    async fn fetch(&self, name: &str) -> Result<Option<Icon>, LoadError>;
}

/// Icons stored as `<root>/<name>.svg`
#[derive(Debug, Clone)]
pub struct DirIconSource {
    root: PathBuf,
}

impl DirIconSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl IconSource for DirIconSource {
    async fn fetch(&self, name: &str) -> Result<Option<Icon>, LoadError> {
        if name.is_empty() || name.contains(['/', '\\', '.']) {
            return Ok(None);
        }
        let path = self.root.join(format!("{name}.svg"));
        match tokio::fs::read_to_string(&path).await {
            Ok(svg) => Ok(Some(Icon {
                name: name.to_string(),
                svg,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// Process-wide icon cache over an [`IconSource`]
///
/// Only found icons are cached; misses and failures are retried on the
/// next request.
#[derive(Debug)]
pub struct IconCache<S> {
    source: S,
    icons: RwLock<HashMap<String, Icon>>,
}

impl<S> IconCache<S>
where
    S: IconSource + Sync,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            icons: RwLock::new(HashMap::new()),
        }
    }

    pub async fn load_icon(&self, name: &str) -> Option<Icon> {
        if let Some(icon) = self.icons.read().get(name) {
            return Some(icon.clone());
        }

        match self.source.fetch(name).await {
            Ok(Some(icon)) => {
                self.icons.write().insert(name.to_string(), icon.clone());
                Some(icon)
            }
            Ok(None) => {
                tracing::warn!(icon = name, "Icon not found");
                None
            }
            Err(e) => {
                tracing::error!(icon = name, error = %e, "Failed to load icon");
                None
            }
        }
    }

    /// Load several icons in order; missing ones are left out
    pub async fn load_icons<I, N>(&self, names: I) -> BTreeMap<String, Icon>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut loaded = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            if let Some(icon) = self.load_icon(name).await {
                loaded.insert(name.to_string(), icon);
            }
        }
        loaded
    }

    pub async fn preload_common_icons(&self) -> BTreeMap<String, Icon> {
        self.load_icons(COMMON_ICONS.iter().copied()).await
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.icons.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.icons.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.read().is_empty()
    }

    pub fn reset(&self) {
        self.icons.write().clear();
    }
}
