//! One hosted lot view: map, viewport, availability and selection together.
//!
//! [`LotView`] owns every piece of per-view state and recomputes the spot
//! bindings explicitly after each transition. Asynchronous inputs (map, lot
//! details, availability) are delivered with the [`RequestToken`] issued when
//! they were requested; responses for a superseded lot or window are dropped.

use chrono::{DateTime, Utc};
use kurbo::Size;
use tracing::{debug, error, info, warn};

use crate::binding::{bind_spots, SpotBinding};
use crate::config::ViewerConfig;
use crate::error::{LotMapError, Result};
use crate::model::{AvailabilityIndex, LotAvailability, LotDetails, Reservation, SpotId, TimeWindow};
use crate::registry::{MapAsset, MapAssetProvider, MapLoadState, NodeRef, SpotRegistry};
use crate::request::{RequestToken, RequestTracker};
use crate::selection::SelectionManager;
use crate::status::{
    auto_select, display_status, match_active_reservation, ClickAction, DisplayStatus,
    EventFilters, StatusResolver,
};
use crate::viewport::{ControlAffordances, TransformController, ViewportInput, ViewportState};

/// Tokens for the requests a freshly opened lot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotTokens {
    pub map: RequestToken,
    pub details: RequestToken,
    pub availability: RequestToken,
}

/// Tokens for the requests a window change needs.
///
/// Both the catalog (its `isAvailableForTime` flags) and the availability
/// service answer for a specific window, so both are asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTokens {
    pub details: RequestToken,
    pub availability: RequestToken,
}

/// Session state of one lot map view.
#[derive(Debug)]
pub struct LotView<P> {
    config: ViewerConfig,
    registry: SpotRegistry<P>,
    controller: TransformController,
    details: Option<LotDetails>,
    details_requests: RequestTracker,
    summary: Option<LotAvailability>,
    availability_requests: RequestTracker,
    availability: AvailabilityIndex,
    selection: SelectionManager,
    filters: EventFilters,
    bindings: Vec<SpotBinding>,
    last_error: Option<LotMapError>,
    revision: u64,
}

impl<P: MapAssetProvider> LotView<P> {
    /// Create a view. Nothing is requested until [`LotView::open_lot`].
    pub fn new(provider: P, config: ViewerConfig) -> Self {
        Self {
            registry: SpotRegistry::new(provider),
            controller: TransformController::new(config.viewport),
            details: None,
            details_requests: RequestTracker::new(),
            summary: None,
            availability_requests: RequestTracker::new(),
            availability: AvailabilityIndex::new(),
            selection: SelectionManager::new(config.mode),
            filters: EventFilters::default(),
            bindings: Vec::new(),
            last_error: None,
            revision: 0,
            config,
        }
    }

    /// Switch to a lot and window. Everything lot-specific is dropped and
    /// fresh tokens are issued for the map, details and availability.
    pub fn open_lot(&mut self, lot_id: &str, window: TimeWindow) -> LotTokens {
        info!("Opening lot {} ({} mode)", lot_id, self.config.mode);
        self.config.lot_id = lot_id.to_string();
        self.config.window = window;

        self.details = None;
        self.summary = None;
        self.availability = AvailabilityIndex::new();
        self.selection.clear();
        self.last_error = None;
        self.controller.set_content(None);

        let tokens = LotTokens {
            map: self.registry.begin(lot_id),
            details: self.details_requests.issue(),
            availability: self.availability_requests.issue(),
        };
        self.recompute();
        tokens
    }

    /// Change the time window.
    ///
    /// The selection and every availability answer for the old window are
    /// dropped, so each spot is unavailable until a response for the new
    /// window arrives. The lot details are kept for the spot catalog but
    /// must be fetched again along with availability.
    pub fn set_window(&mut self, window: TimeWindow) -> WindowTokens {
        debug!("Window changed to {} - {}", window.start, window.end);
        self.config.window = window;
        self.selection.clear();
        self.summary = None;
        self.availability = AvailabilityIndex::new();

        let tokens = WindowTokens {
            details: self.details_requests.issue(),
            availability: self.availability_requests.issue(),
        };
        self.recompute();
        tokens
    }

    /// Ask again for the current window's details and availability, e.g. on
    /// a poll. Current state stays in place until the answers arrive; any
    /// answer still in flight becomes stale.
    pub fn refresh(&mut self) -> WindowTokens {
        debug!("Refreshing {}", self.config.lot_id);
        WindowTokens {
            details: self.details_requests.issue(),
            availability: self.availability_requests.issue(),
        }
    }

    /// Load the current lot's map through the provider, synchronously.
    pub fn resolve_map(&mut self) -> &MapLoadState {
        let lot_id = self.config.lot_id.clone();
        let token = self.registry.begin(&lot_id);
        let result = self.registry.fetch(&lot_id);
        self.complete_map_load(token, result);
        self.registry.state()
    }

    /// Deliver a map load result. Returns `false` if `token` was superseded.
    pub fn complete_map_load(&mut self, token: RequestToken, result: Result<MapAsset>) -> bool {
        if !self.registry.complete(token, result) {
            return false;
        }
        let size = self.registry.asset().and_then(MapAsset::size);
        self.controller.set_content(size);
        self.recompute();
        true
    }

    /// Deliver the lot details. Returns `false` if `token` was superseded.
    ///
    /// On failure the last-known spot states are kept and the error is
    /// exposed through [`LotView::last_error`].
    pub fn apply_details(&mut self, token: RequestToken, result: Result<LotDetails>) -> bool {
        if !self.details_requests.complete(token) {
            warn!("Dropping stale lot details (request {})", token.generation());
            return false;
        }

        match result {
            Ok(details) => {
                info!(
                    "Lot details for {}: {} spot(s)",
                    self.config.lot_id,
                    details.spots.len()
                );
                self.availability = AvailabilityIndex::from_details(&details);
                if let Some(summary) = &self.summary {
                    self.availability.apply(summary);
                }
                self.details = Some(details);
                self.last_error = None;
                self.selection.evict_unavailable(&self.availability);
                self.run_auto_select();
            }
            Err(e) => {
                error!("Error loading lot details for {}: {}", self.config.lot_id, e);
                self.last_error = Some(e);
            }
        }
        self.recompute();
        true
    }

    /// Deliver window-aware availability. Returns `false` if `token` was
    /// superseded.
    ///
    /// Selected spots that became unavailable are evicted and auto-selection
    /// runs again, so the event selection does not depend on whether details
    /// or availability answered first.
    pub fn apply_availability(
        &mut self,
        token: RequestToken,
        result: Result<LotAvailability>,
    ) -> bool {
        if !self.availability_requests.complete(token) {
            warn!("Dropping stale availability (request {})", token.generation());
            return false;
        }

        match result {
            Ok(summary) => {
                debug!(
                    "Availability for {}: {}/{} available",
                    self.config.lot_id, summary.available, summary.total
                );
                self.availability.apply(&summary);
                self.summary = Some(summary);
                self.last_error = None;
                self.selection.evict_unavailable(&self.availability);
                self.run_auto_select();
            }
            Err(e) => {
                error!("Error loading availability for {}: {}", self.config.lot_id, e);
                self.last_error = Some(e);
            }
        }
        self.recompute();
        true
    }

    /// Last details or availability error, cleared by the next success.
    pub fn last_error(&self) -> Option<&LotMapError> {
        self.last_error.as_ref()
    }

    /// Replace the event filters. Re-runs auto-selection in event mode.
    pub fn set_filters(&mut self, filters: EventFilters) {
        self.filters = filters;
        self.run_auto_select();
        self.recompute();
    }

    fn run_auto_select(&mut self) {
        if !self.selection.mode().is_multi_select() {
            return;
        }
        let Some(details) = &self.details else {
            return;
        };
        let picked = auto_select(&details.spots, &self.availability, &self.filters);
        debug!("Auto-selected {} spot(s)", picked.len());
        self.selection.replace_all(picked, &self.availability);
    }

    /// Feed one viewport input event.
    pub fn input(&mut self, input: ViewportInput) -> ViewportState {
        self.controller.handle(input)
    }

    /// Report the measured size of the rendered map.
    pub fn set_content_metrics(&mut self, size: Size) {
        self.controller.set_content(Some(size));
    }

    /// Click on a map node. Selection changes are applied before returning.
    pub fn click(&mut self, node_ref: NodeRef) -> ClickAction {
        let Some(spot_id) = self
            .bindings
            .iter()
            .find(|b| b.node_ref == node_ref)
            .map(|b| b.spot_id.clone())
        else {
            return ClickAction::None;
        };

        let action = StatusResolver::new(&self.availability, &self.selection).click(&spot_id);
        match &action {
            ClickAction::Select(id) => {
                self.selection.select(id.clone(), &self.availability);
            }
            ClickAction::Deselect(id) => {
                self.selection.deselect(id);
            }
            ClickAction::ShowDetails(id) => debug!("Showing details for {}", id),
            ClickAction::None => {}
        }
        self.recompute();
        action
    }

    fn recompute(&mut self) {
        let bindings = match self.registry.asset() {
            Some(asset) => {
                let known_lots = self
                    .details
                    .as_ref()
                    .map(LotDetails::known_lot_ids)
                    .unwrap_or_default();
                let resolver = StatusResolver::new(&self.availability, &self.selection);
                bind_spots(
                    asset,
                    &known_lots,
                    &resolver,
                    self.config.mode,
                    self.config.highlighted_spot.as_ref(),
                )
            }
            None => Vec::new(),
        };

        if bindings != self.bindings {
            self.bindings = bindings;
            self.revision += 1;
        }
    }

    /// Current spot bindings in document order.
    pub fn bindings(&self) -> &[SpotBinding] {
        &self.bindings
    }

    pub fn viewport(&self) -> ViewportState {
        self.controller.state()
    }

    pub fn affordances(&self) -> ControlAffordances {
        self.controller.affordances()
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn map_state(&self) -> &MapLoadState {
        self.registry.state()
    }

    pub fn details(&self) -> Option<&LotDetails> {
        self.details.as_ref()
    }

    pub fn availability(&self) -> &AvailabilityIndex {
        &self.availability
    }

    pub fn filters(&self) -> &EventFilters {
        &self.filters
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Status for the detail panel of one spot, from the reservations found
    /// for it and the availability service's flag.
    pub fn detail_status(
        &self,
        spot_id: &SpotId,
        reservations: &[Reservation],
        now: DateTime<Utc>,
    ) -> DisplayStatus {
        let reservation = match_active_reservation(reservations, now);
        display_status(now, reservation, self.availability.is_available(spot_id))
    }

    /// Bumped whenever the bindings change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewMode;
    use crate::model::{Spot, SpotAvailability, SpotStatus};
    use crate::registry::InMemoryProvider;
    use crate::status::SpotVisualState;
    use crate::viewport::metrics;
    use chrono::TimeZone;
    use kurbo::Point;

    const MAP: &str = r#"<svg width="1000" height="500">
  <path data-vectornator-layer-name="Spot1"/>
  <path data-vectornator-layer-name="Spot2"/>
  <path data-vectornator-layer-name="Spot3"/>
</svg>"#;

    fn window() -> TimeWindow {
        ViewerConfig::window_from(Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(), 2)
    }

    fn view(mode: ViewMode) -> (LotView<InMemoryProvider>, LotTokens) {
        let provider = InMemoryProvider::new().with_asset("WST01", MAP);
        let mut view = LotView::new(provider, ViewerConfig::new(mode, "WST01", window()));
        let tokens = view.open_lot("WST01", window());
        (view, tokens)
    }

    fn details() -> LotDetails {
        LotDetails {
            spots: vec![
                Spot::new(SpotId::new("WST01", 1), "faculty"),
                Spot::new(SpotId::new("WST01", 2), "commuter"),
                Spot::new(SpotId::new("WST01", 3), "faculty"),
            ],
            ..LotDetails::default()
        }
    }

    fn availability(unavailable: &[u32]) -> LotAvailability {
        LotAvailability {
            spots: (1..=3)
                .map(|i| SpotAvailability {
                    spot_id: SpotId::new("WST01", i),
                    available: !unavailable.contains(&i),
                    status: SpotStatus::Available,
                    spot_type: None,
                })
                .collect(),
            ..LotAvailability::default()
        }
    }

    fn selected(view: &LotView<InMemoryProvider>) -> Vec<&str> {
        view.selection().items().iter().map(|id| id.as_str()).collect()
    }

    // ==================== Map lifecycle ====================

    #[test]
    fn test_viewport_waits_for_map() {
        let (mut view, _) = view(ViewMode::Browse);
        view.input(ViewportInput::Resize(metrics(800.0, 600.0)));
        assert_eq!(view.input(ViewportInput::ZoomIn), ViewportState::default());
        assert!(view.bindings().is_empty());

        assert!(view.resolve_map().asset().is_some());
        let state = view.viewport();
        assert_eq!(state.scale, 1.2);
        assert_eq!(state.offset.x, -200.0);
        assert_eq!(view.bindings().len(), 3);
    }

    #[test]
    fn test_missing_map_is_distinct() {
        let provider = InMemoryProvider::new();
        let mut view = LotView::new(provider, ViewerConfig::new(ViewMode::Browse, "CPC01", window()));
        view.open_lot("CPC01", window());
        assert!(view.map_state().is_loading());
        assert!(matches!(view.resolve_map(), MapLoadState::NoMap { .. }));
        assert!(view.bindings().is_empty());
    }

    #[test]
    fn test_stale_map_load_dropped() {
        let (mut view, tokens) = view(ViewMode::Browse);
        view.open_lot("WST01", window());
        let asset = MapAsset::parse_svg("WST01", MAP).unwrap();
        assert!(!view.complete_map_load(tokens.map, Ok(asset)));
        assert!(view.map_state().is_loading());
    }

    // ==================== Availability ====================

    #[test]
    fn test_stale_availability_ignored() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));

        assert!(view.availability().is_available(&SpotId::new("WST01", 1)));

        let fresh = view.set_window(window());
        assert!(view.availability().is_empty());
        assert!(!view.apply_availability(tokens.availability, Ok(availability(&[2, 3]))));
        assert!(view.availability().is_empty());

        assert!(view.apply_availability(fresh.availability, Ok(availability(&[1]))));
        assert!(!view.availability().is_available(&SpotId::new("WST01", 1)));
        assert!(view.availability().is_available(&SpotId::new("WST01", 2)));
    }

    #[test]
    fn test_window_change_blocks_clicks_until_availability() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));
        view.apply_availability(tokens.availability, Ok(availability(&[])));
        view.set_filters(EventFilters::new(1).with_category("commuter"));
        assert_eq!(selected(&view), vec!["WST01-0002"]);

        let later = ViewerConfig::window_from(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(), 2);
        let fresh = view.set_window(later);
        assert!(view.selection().is_empty());
        assert!(view
            .bindings()
            .iter()
            .all(|b| b.state == SpotVisualState::Unavailable && !b.interactive));

        // Spot 1 is reserved in the new window; the old answer must not let it through.
        assert_eq!(view.click(NodeRef(1)), ClickAction::None);
        assert!(view.selection().is_empty());

        // Old details are stale too.
        assert!(!view.apply_details(tokens.details, Ok(details())));
        assert!(view.apply_availability(fresh.availability, Ok(availability(&[1]))));
        assert_eq!(view.click(NodeRef(1)), ClickAction::None);
        assert_eq!(selected(&view), vec!["WST01-0002"]);
        assert!(view.apply_details(fresh.details, Ok(details())));
        assert_eq!(selected(&view), vec!["WST01-0002"]);
    }

    #[test]
    fn test_malformed_availability_surfaced() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));
        let before = view.bindings().to_vec();

        let payload = serde_json::json!({ "spots": "oops" });
        view.apply_availability(tokens.availability, LotAvailability::from_value(payload));
        assert!(matches!(
            view.last_error(),
            Some(LotMapError::MalformedAvailabilityPayload { .. })
        ));
        assert_eq!(view.bindings(), before.as_slice());
    }

    #[test]
    fn test_availability_evicts_selection() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));
        view.set_filters(EventFilters::new(3));
        assert_eq!(selected(&view), vec!["WST01-0001", "WST01-0002", "WST01-0003"]);

        view.apply_availability(tokens.availability, Ok(availability(&[2])));
        assert_eq!(selected(&view), vec!["WST01-0001", "WST01-0003"]);
        assert_eq!(view.bindings()[1].state, SpotVisualState::Unavailable);
    }

    // ==================== Selection ====================

    #[test]
    fn test_auto_select_on_details() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.set_filters(EventFilters::new(2).with_category("faculty"));
        assert!(view.selection().is_empty());

        view.apply_details(tokens.details, Ok(details()));
        assert_eq!(selected(&view), vec!["WST01-0001", "WST01-0003"]);
    }

    #[test]
    fn test_click_toggles_in_event_mode() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));
        view.set_filters(EventFilters::new(1).with_category("commuter"));
        assert_eq!(selected(&view), vec!["WST01-0002"]);

        let revision = view.revision();
        let action = view.click(NodeRef(1));
        assert_eq!(action, ClickAction::Select(SpotId::new("WST01", 1)));
        assert_eq!(selected(&view), vec!["WST01-0002", "WST01-0001"]);
        assert!(view.revision() > revision);

        let action = view.click(NodeRef(2));
        assert_eq!(action, ClickAction::Deselect(SpotId::new("WST01", 2)));
        assert_eq!(selected(&view), vec!["WST01-0001"]);

        assert_eq!(view.click(NodeRef(0)), ClickAction::None);
    }

    #[test]
    fn test_browse_click_shows_details() {
        let (mut view, tokens) = view(ViewMode::Browse);
        view.resolve_map();
        view.apply_details(tokens.details, Ok(details()));
        view.set_filters(EventFilters::new(2));

        let action = view.click(NodeRef(1));
        assert_eq!(action, ClickAction::ShowDetails(SpotId::new("WST01", 1)));
        assert!(view.selection().is_empty());
    }

    #[test]
    fn test_open_lot_clears_selection() {
        let (mut view, tokens) = view(ViewMode::EventSelect);
        view.apply_details(tokens.details, Ok(details()));
        view.set_filters(EventFilters::new(1));
        assert_eq!(view.selection().len(), 1);

        view.open_lot("WST01", window());
        assert!(view.selection().is_empty());
        assert!(view.details().is_none());
    }

    #[test]
    fn test_detail_status() {
        let (mut view, tokens) = view(ViewMode::Browse);
        view.apply_details(tokens.details, Ok(details()));
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let spot = SpotId::new("WST01", 1);

        assert_eq!(view.detail_status(&spot, &[], now), DisplayStatus::Available);
        let r = Reservation::new(now - chrono::Duration::hours(1), now + chrono::Duration::hours(1));
        assert_eq!(view.detail_status(&spot, &[r], now), DisplayStatus::Occupied);
    }

    #[test]
    fn test_drag_after_load() {
        let (mut view, _) = view(ViewMode::Browse);
        view.input(ViewportInput::Resize(metrics(800.0, 600.0)));
        view.resolve_map();
        view.input(ViewportInput::PointerDown(Point::new(100.0, 100.0)));
        let state = view.input(ViewportInput::PointerMove(Point::new(150.0, 100.0)));
        assert_eq!(state.offset.x, -150.0);
        view.input(ViewportInput::PointerLeave);
        let state = view.input(ViewportInput::PointerMove(Point::new(400.0, 100.0)));
        assert_eq!(state.offset.x, -150.0);
    }
}
