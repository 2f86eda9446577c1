//! lotmap - Pan/zoom viewport and spot status engine for parking-lot maps.
//!
//! This library fits, pans and zooms a vector map of a parking lot inside a
//! fixed viewport and binds every spot drawn in the map to its live state
//! (unavailable, available, selected) for the current time window.
//!
//! # Example
//!
//! ```no_run
//! use lotmap::{DirectoryProvider, LotView, ViewMode, ViewerConfig};
//! use lotmap::viewport::{metrics, ViewportInput};
//!
//! let start = chrono::Utc::now();
//! let config = ViewerConfig::new(ViewMode::Browse, "WST01", ViewerConfig::window_from(start, 2));
//! let mut view = LotView::new(DirectoryProvider::new("maps"), config);
//! view.open_lot("WST01", ViewerConfig::window_from(start, 2));
//! view.input(ViewportInput::Resize(metrics(800.0, 600.0)));
//! view.resolve_map();
//! println!("{}", view.viewport().zoom_percent());
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod request;
pub mod search;
pub mod selection;
pub mod session;
pub mod status;
pub mod theme;
pub mod viewport;

// Re-exports for convenience
pub use binding::{bind_spots, Cursor, Paint, SpotBinding};
pub use config::{ViewMode, ViewerConfig, ViewportConfig};
pub use error::{LotMapError, Result};
pub use model::{AvailabilityIndex, LotAvailability, LotDetails, Spot, SpotId, TimeWindow};
pub use registry::{DirectoryProvider, InMemoryProvider, MapAsset, MapAssetProvider, MapLoadState, NodeRef};
pub use selection::SelectionManager;
pub use search::{lot_candidates, rank_lots, LotCandidate, LotSearch, NearbySpot};
pub use session::{LotTokens, LotView, WindowTokens};
pub use status::{ClickAction, EventFilters, SpotVisualState, StatusResolver};
pub use viewport::{TransformController, ViewportState};

/// Run event-mode auto-selection for a lot and return the resolved bindings.
///
/// This is the whole offline pipeline in one call:
/// 1. Load the lot map through the provider
/// 2. Merge catalog and window-aware availability
/// 3. Auto-select spots matching the filters
/// 4. Bind every spot node of the map
///
/// # Arguments
///
/// * `provider` - Source of map assets
/// * `lot_id` - Lot to resolve
/// * `details` - Catalog response for the lot
/// * `availability` - Optional window-aware availability response
/// * `filters` - Event filters, including the number of spots needed
pub fn select_spots<P: MapAssetProvider>(
    provider: &P,
    lot_id: &str,
    details: &LotDetails,
    availability: Option<&LotAvailability>,
    filters: &EventFilters,
) -> Result<Vec<SpotBinding>> {
    let asset = provider.load(lot_id)?;

    let mut index = AvailabilityIndex::from_details(details);
    if let Some(availability) = availability {
        index.apply(availability);
    }

    let mut selection = SelectionManager::new(ViewMode::EventSelect);
    let picked = status::auto_select(&details.spots, &index, filters);
    selection.replace_all(picked, &index);

    let resolver = StatusResolver::new(&index, &selection);
    Ok(bind_spots(
        &asset,
        &details.known_lot_ids(),
        &resolver,
        ViewMode::EventSelect,
        None,
    ))
}
