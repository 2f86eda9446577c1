//! Lot id to map asset resolution.

mod asset;
mod provider;

pub use asset::{to_spot_id, MapAsset, MapNode, NodeRef, SpotNode};
pub use provider::{DirectoryProvider, InMemoryProvider, MapAssetProvider};

use tracing::{error, info, warn};

use crate::error::{LotMapError, Result};
use crate::request::{RequestToken, RequestTracker};

/// Where the map for the current lot stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MapLoadState {
    /// No lot requested yet.
    #[default]
    Idle,
    /// Resolution in flight.
    Loading { lot_id: String },
    /// Map available.
    Ready(MapAsset),
    /// The lot has no map. Terminal.
    NoMap { lot_id: String },
    /// The map exists but could not be loaded.
    Failed { lot_id: String, message: String },
}

impl MapLoadState {
    /// The loaded asset, if ready.
    pub fn asset(&self) -> Option<&MapAsset> {
        match self {
            MapLoadState::Ready(asset) => Some(asset),
            _ => None,
        }
    }

    /// Check if resolution is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, MapLoadState::Loading { .. })
    }

    /// Check if the lot ended up without a usable map.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MapLoadState::NoMap { .. } | MapLoadState::Failed { .. })
    }
}

/// Resolves lot maps through a provider and tracks the current resolution.
#[derive(Debug)]
pub struct SpotRegistry<P> {
    provider: P,
    state: MapLoadState,
    requests: RequestTracker,
}

impl<P: MapAssetProvider> SpotRegistry<P> {
    /// Create a registry over a provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: MapLoadState::Idle,
            requests: RequestTracker::new(),
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current load state.
    pub fn state(&self) -> &MapLoadState {
        &self.state
    }

    /// The loaded asset, if ready.
    pub fn asset(&self) -> Option<&MapAsset> {
        self.state.asset()
    }

    /// Start resolving `lot_id`. Any earlier resolution becomes stale.
    pub fn begin(&mut self, lot_id: &str) -> RequestToken {
        self.state = MapLoadState::Loading {
            lot_id: lot_id.to_string(),
        };
        self.requests.issue()
    }

    /// Run the provider. Does not touch the registry state.
    pub fn fetch(&self, lot_id: &str) -> Result<MapAsset> {
        self.provider.load(lot_id)
    }

    /// Deliver a resolution result. Returns `false` if `token` was superseded.
    pub fn complete(&mut self, token: RequestToken, result: Result<MapAsset>) -> bool {
        if !self.requests.complete(token) {
            warn!(
                "Dropping stale map response (request {})",
                token.generation()
            );
            return false;
        }

        let lot_id = match &self.state {
            MapLoadState::Loading { lot_id } => lot_id.clone(),
            _ => String::new(),
        };

        self.state = match result {
            Ok(asset) => {
                info!(
                    "Loaded map for {} with {} spot node(s)",
                    asset.lot_id(),
                    asset.enumerate_spots().len()
                );
                MapLoadState::Ready(asset)
            }
            Err(LotMapError::AssetNotFound { lot_id }) => {
                warn!("No map registered for lot {}", lot_id);
                MapLoadState::NoMap { lot_id }
            }
            Err(e) => {
                error!("Error loading map for lot {}: {}", lot_id, e);
                MapLoadState::Failed {
                    lot_id,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Resolve synchronously: begin, fetch and complete in one step.
    pub fn resolve(&mut self, lot_id: &str) -> &MapLoadState {
        let token = self.begin(lot_id);
        let result = self.fetch(lot_id);
        self.complete(token, result);
        &self.state
    }

    /// Forget the current map and cancel any resolution in flight.
    pub fn reset(&mut self) {
        self.requests.cancel();
        self.state = MapLoadState::Idle;
    }
}
