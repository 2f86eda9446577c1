//! Vector map assets and their addressable spot nodes.

use std::collections::BTreeSet;

use kurbo::Size;
use serde::Serialize;
use tracing::debug;

use crate::config::{LAYER_NAME_ATTR, RAW_LAYER_NAME_ATTR, SPOT_LABEL_PREFIX};
use crate::error::{LotMapError, Result};
use crate::model::{spot_label_index, SpotId};

/// Position of an element in document order. Stable for one loaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeRef(pub usize);

/// A labelled element of the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNode {
    pub node_ref: NodeRef,
    /// Element name (`path`, `g`, ...).
    pub tag: String,
    /// Layer name given in the drawing tool.
    pub label: String,
    /// Label of the nearest enclosing labelled `<g>`.
    pub group: Option<String>,
}

/// A map node recognised as a parking spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotNode {
    pub node_ref: NodeRef,
    pub label: String,
    /// Sequential number from the label (`Spot7` -> 7).
    pub index: u32,
    pub group: Option<String>,
}

/// A loaded lot map: intrinsic size plus every labelled node.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAsset {
    lot_id: String,
    size: Option<Size>,
    nodes: Vec<MapNode>,
    element_count: usize,
}

/// Layer name given to an element in the drawing tool, if any.
fn layer_name<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.attribute(LAYER_NAME_ATTR)
        .or_else(|| node.attribute(RAW_LAYER_NAME_ATTR))
        .map(str::trim)
}

/// Parse an SVG length such as `1131`, `1131px` or `1131.5`.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.trim().parse().ok().filter(|v: &f64| v.is_finite() && *v > 0.0)
}

/// Intrinsic size of the root element from `width`/`height`, else `viewBox`.
fn root_size(root: roxmltree::Node<'_, '_>) -> Option<Size> {
    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);
    if let (Some(w), Some(h)) = (width, height) {
        return Some(Size::new(w, h));
    }

    let view_box = root.attribute("viewBox")?;
    let parts: Vec<f64> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    match parts.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some(Size::new(*w, *h)),
        _ => None,
    }
}

impl MapAsset {
    /// Parse an SVG document and collect its labelled nodes.
    pub fn parse_svg(lot_id: &str, svg: &str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(svg, options).map_err(|e| {
            LotMapError::AssetLoadFailed {
                lot_id: lot_id.to_string(),
                message: e.to_string(),
            }
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(LotMapError::AssetLoadFailed {
                lot_id: lot_id.to_string(),
                message: "not an SVG document".to_string(),
            });
        }

        let mut nodes = Vec::new();
        let mut element_count = 0;
        for (position, node) in doc.descendants().filter(|n| n.is_element()).enumerate() {
            element_count = position + 1;
            let Some(label) = layer_name(node) else {
                continue;
            };

            // Nearest enclosing <g> that carries a layer name.
            let group = node
                .ancestors()
                .skip(1)
                .filter(|a| a.is_element() && a.tag_name().name() == "g")
                .find_map(layer_name)
                .map(str::to_string);

            nodes.push(MapNode {
                node_ref: NodeRef(position),
                tag: node.tag_name().name().to_string(),
                label: label.to_string(),
                group,
            });
        }

        debug!(
            "Parsed map for {}: {} elements, {} labelled",
            lot_id,
            element_count,
            nodes.len()
        );

        Ok(Self {
            lot_id: lot_id.to_string(),
            size: root_size(root),
            nodes,
            element_count,
        })
    }

    /// Lot the asset was resolved for.
    pub fn lot_id(&self) -> &str {
        &self.lot_id
    }

    /// Intrinsic size declared by the document, if any.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Every labelled node in document order.
    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    /// Total number of elements in the document.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Nodes following the `Spot<integer>` convention, in document order.
    pub fn enumerate_spots(&self) -> Vec<SpotNode> {
        self.nodes
            .iter()
            .filter_map(|node| match spot_label_index(&node.label) {
                Some(index) => Some(SpotNode {
                    node_ref: node.node_ref,
                    label: node.label.clone(),
                    index,
                    group: node.group.clone(),
                }),
                None => {
                    if node.label.starts_with(SPOT_LABEL_PREFIX) {
                        debug!("Skipping unparseable spot label '{}'", node.label);
                    }
                    None
                }
            })
            .collect()
    }

    /// Spot ids for every spot node.
    ///
    /// A spot drawn inside a group named after one of `known_lots` belongs to
    /// that lot; every other spot belongs to the asset's own lot.
    pub fn spot_ids(&self, known_lots: &BTreeSet<String>) -> Vec<(SpotId, NodeRef)> {
        self.enumerate_spots()
            .into_iter()
            .map(|spot| {
                let lot = spot
                    .group
                    .as_deref()
                    .filter(|group| known_lots.contains(*group))
                    .unwrap_or(self.lot_id.as_str());
                (SpotId::new(lot, spot.index), spot.node_ref)
            })
            .collect()
    }
}

/// Spot id for a map label, in the catalog's wire format.
pub fn to_spot_id(lot_id: &str, label: &str) -> Result<SpotId> {
    SpotId::from_label(lot_id, label)
}
