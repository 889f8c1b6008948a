use crate::models::style::StyleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rendered popup content for one placemark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    pub name: String,
    pub style: StyleId,
    pub description: Description,
    pub longitude: f64,
    pub latitude: f64,
    /// Meters, 0 when unknown
    pub altitude: f64,
}

impl Placemark {
    /// `longitude,latitude,altitude` as the document format expects
    pub fn coordinates(&self) -> String {
        format!("{},{},{}", self.longitude, self.latitude, self.altitude)
    }
}

/// One output layer: style definitions followed by placemarks.
///
/// Styles are kept in a sorted set so they always serialise in base-then-status
/// order regardless of the order placemarks referenced them. Placemarks keep
/// insertion order, which is source-row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    name: String,
    styles: BTreeSet<StyleId>,
    placemarks: Vec<Placemark>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: BTreeSet::new(),
            placemarks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a style definition; adding the same id twice is a no-op
    pub fn add_style(&mut self, style: StyleId) -> bool {
        self.styles.insert(style)
    }

    /// Append a placemark, registering its style if needed
    pub fn add_placemark(&mut self, placemark: Placemark) {
        self.add_style(placemark.style);
        self.placemarks.push(placemark);
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleId> {
        self.styles.iter()
    }

    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }
}
