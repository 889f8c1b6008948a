use serde::{Deserialize, Serialize};

/// Output partitions; one document is produced per layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Airports,
    Heliports,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Airports, Layer::Heliports];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "airports" | "airport" => Some(Layer::Airports),
            "heliports" | "heliport" => Some(Layer::Heliports),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Layer::Airports => "airports",
            Layer::Heliports => "heliports",
        }
    }

    pub fn document_name(&self) -> &'static str {
        match self {
            Layer::Airports => "Mexican Airports",
            Layer::Heliports => "Mexican Heliports",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Icon family. Declaration order is the style emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StyleBase {
    Aerodrome,
    Heliport,
    SeaplaneBase,
    TakeoffZone,
}

impl StyleBase {
    pub const ALL: [StyleBase; 4] = [
        StyleBase::Aerodrome,
        StyleBase::Heliport,
        StyleBase::SeaplaneBase,
        StyleBase::TakeoffZone,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StyleBase::Aerodrome => "aerodrome",
            StyleBase::Heliport => "heliport",
            StyleBase::SeaplaneBase => "seaplane_base",
            StyleBase::TakeoffZone => "takeoff_zone",
        }
    }
}

/// Icon colouring by permit status. Declaration order is the style emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusSuffix {
    Active,
    InPermit,
    Inactive,
}

impl StatusSuffix {
    pub const ALL: [StatusSuffix; 3] = [
        StatusSuffix::Active,
        StatusSuffix::InPermit,
        StatusSuffix::Inactive,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StatusSuffix::Active => "active",
            StatusSuffix::InPermit => "in_permit",
            StatusSuffix::Inactive => "inactive",
        }
    }
}

/// `{base}_{suffix}`; ordering follows base then suffix declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleId {
    pub base: StyleBase,
    pub suffix: StatusSuffix,
}

impl StyleId {
    pub fn new(base: StyleBase, suffix: StatusSuffix) -> Self {
        Self { base, suffix }
    }

    /// Every style the classifier can produce, in emission order
    pub fn all() -> impl Iterator<Item = StyleId> {
        StyleBase::ALL.into_iter().flat_map(|base| {
            StatusSuffix::ALL
                .into_iter()
                .map(move |suffix| StyleId::new(base, suffix))
        })
    }

    pub fn icon_file_name(&self) -> String {
        format!("{}.png", self)
    }

    /// Relative href used inside the document, e.g. `files/heliport_active.png`
    pub fn icon_href(&self) -> String {
        format!("{}/{}", crate::utils::ICON_DIR, self.icon_file_name())
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.base.key(), self.suffix.key())
    }
}
