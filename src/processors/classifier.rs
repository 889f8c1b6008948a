use crate::models::{Layer, StatusSuffix, StyleBase, StyleId};
use std::collections::BTreeSet;

pub const AERODROME: &str = "Aerodrome";
pub const HELIPORT: &str = "Heliport";
pub const HELIPORT_BOAT: &str = "Heliport (Boat)";
pub const HELIPORT_PLATFORM: &str = "Heliport Platform";
pub const HELIPLATFORM: &str = "Heliplatform";
pub const SEAPLANE_BASE: &str = "Seaplane Base";
pub const TAKEOFF_ZONE: &str = "Takeoff Zone";
pub const AERODROME_HELIPORT: &str = "Aerodrome Heliport";

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_IN_PROCESS: &str = "In Process";

const AIRPORT_TYPES: [&str; 3] = [AERODROME, SEAPLANE_BASE, AERODROME_HELIPORT];

const HELIPORT_TYPES: [&str; 6] = [
    HELIPORT,
    HELIPORT_BOAT,
    HELIPORT_PLATFORM,
    TAKEOFF_ZONE,
    HELIPLATFORM,
    AERODROME_HELIPORT,
];

/// Icon family for a canonical aerodrome type.
///
/// "Aerodrome Heliport" sits in both layers and takes the icon of whichever
/// document is being built.
pub fn resolve_base(aerodrome_type: &str, layer: Layer) -> StyleBase {
    match aerodrome_type {
        AERODROME => StyleBase::Aerodrome,
        HELIPORT | HELIPORT_BOAT | HELIPORT_PLATFORM | HELIPLATFORM => StyleBase::Heliport,
        SEAPLANE_BASE => StyleBase::SeaplaneBase,
        TAKEOFF_ZONE => StyleBase::TakeoffZone,
        AERODROME_HELIPORT => match layer {
            Layer::Heliports => StyleBase::Heliport,
            Layer::Airports => StyleBase::Aerodrome,
        },
        _ => StyleBase::Aerodrome,
    }
}

pub fn resolve_suffix(status: &str) -> StatusSuffix {
    match status {
        STATUS_ACTIVE => StatusSuffix::Active,
        STATUS_IN_PROCESS => StatusSuffix::InPermit,
        _ => StatusSuffix::Inactive,
    }
}

pub fn resolve_style(aerodrome_type: &str, status: &str, layer: Layer) -> StyleId {
    StyleId::new(resolve_base(aerodrome_type, layer), resolve_suffix(status))
}

/// Every style a record in `layer` can resolve to, in emission order.
///
/// Airports also carry the fallback base given to unnormalised types.
pub fn layer_styles(layer: Layer) -> BTreeSet<StyleId> {
    let types: &[&str] = match layer {
        Layer::Airports => &AIRPORT_TYPES,
        Layer::Heliports => &HELIPORT_TYPES,
    };
    let mut bases: BTreeSet<StyleBase> = types
        .iter()
        .map(|aerodrome_type| resolve_base(aerodrome_type, layer))
        .collect();
    if layer == Layer::Airports {
        bases.insert(resolve_base("", layer));
    }

    bases
        .into_iter()
        .flat_map(|base| {
            StatusSuffix::ALL
                .into_iter()
                .map(move |suffix| StyleId::new(base, suffix))
        })
        .collect()
}

/// Layers a record of this type is rendered into.
///
/// Types the tables could not normalise default to the airports layer,
/// matching their default "aerodrome" icon.
pub fn layer_membership(aerodrome_type: &str) -> BTreeSet<Layer> {
    let mut layers = BTreeSet::new();
    if AIRPORT_TYPES.contains(&aerodrome_type) {
        layers.insert(Layer::Airports);
    }
    if HELIPORT_TYPES.contains(&aerodrome_type) {
        layers.insert(Layer::Heliports);
    }
    if layers.is_empty() {
        layers.insert(Layer::Airports);
    }
    layers
}
