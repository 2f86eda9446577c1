//! Map asset providers keyed by lot id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::asset::MapAsset;
use crate::error::{LotMapError, Result};

/// Resolves a lot id to its map asset.
///
/// Implementations must report a lot without a map as
/// [`LotMapError::AssetNotFound`] and keep every other failure distinct.
pub trait MapAssetProvider {
    /// Load and scan the map for `lot_id`.
    fn load(&self, lot_id: &str) -> Result<MapAsset>;
}

impl<P: MapAssetProvider + ?Sized> MapAssetProvider for &P {
    fn load(&self, lot_id: &str) -> Result<MapAsset> {
        (**self).load(lot_id)
    }
}

impl<P: MapAssetProvider + ?Sized> MapAssetProvider for Box<P> {
    fn load(&self, lot_id: &str) -> Result<MapAsset> {
        (**self).load(lot_id)
    }
}

/// Check that a lot id can be used as a file stem.
fn is_plain_lot_id(lot_id: &str) -> bool {
    !lot_id.is_empty()
        && !lot_id.starts_with('.')
        && !lot_id.contains("..")
        && !lot_id.contains(['/', '\\'])
}

/// Loads `<root>/<lotId>.svg`.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    /// Create a provider over a directory of SVG maps.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being served.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a lot, or `None` if the id cannot name a file here.
    pub fn path_for(&self, lot_id: &str) -> Option<PathBuf> {
        is_plain_lot_id(lot_id).then(|| self.root.join(format!("{}.svg", lot_id)))
    }
}

impl MapAssetProvider for DirectoryProvider {
    fn load(&self, lot_id: &str) -> Result<MapAsset> {
        let not_found = || LotMapError::AssetNotFound {
            lot_id: lot_id.to_string(),
        };
        let path = self.path_for(lot_id).ok_or_else(not_found)?;

        let svg = match std::fs::read_to_string(&path) {
            Ok(svg) => svg,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(LotMapError::AssetLoadFailed {
                    lot_id: lot_id.to_string(),
                    message: format!("{}: {}", path.display(), e),
                })
            }
        };

        MapAsset::parse_svg(lot_id, &svg)
    }
}

/// Maps held in memory, for embedded assets and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    assets: HashMap<String, String>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the SVG source for a lot.
    pub fn insert(&mut self, lot_id: impl Into<String>, svg: impl Into<String>) {
        self.assets.insert(lot_id.into(), svg.into());
    }

    /// Builder form of [`InMemoryProvider::insert`].
    pub fn with_asset(mut self, lot_id: impl Into<String>, svg: impl Into<String>) -> Self {
        self.insert(lot_id, svg);
        self
    }
}

impl MapAssetProvider for InMemoryProvider {
    fn load(&self, lot_id: &str) -> Result<MapAsset> {
        let svg = self
            .assets
            .get(lot_id)
            .ok_or_else(|| LotMapError::AssetNotFound {
                lot_id: lot_id.to_string(),
            })?;
        MapAsset::parse_svg(lot_id, svg)
    }
}
