//! Map view centered on the selected visible row.

use serde::{Deserialize, Serialize};

use crate::traits::{Projection, ProjectionInput};

pub const DEFAULT_CENTER: LatLong = LatLong {
    lat: 30.75,
    long: -97.48,
};
pub const DEFAULT_ZOOM: u8 = 10;
pub const UNKNOWN: &str = "Unknown";
pub const POPUP_TITLE: &str = "Animal Details";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub name: String,
    pub animal_type: String,
    pub breed: String,
}

impl Popup {
    /// Body lines in display order.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Name: {}", self.name),
            format!("Type: {}", self.animal_type),
            format!("Breed: {}", self.breed),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: LatLong,
    pub tooltip: String,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    pub center: LatLong,
    pub zoom: u8,
    pub width_px: u32,
    pub height_px: u32,
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone)]
pub struct LocationMap {
    pub default_center: LatLong,
    pub zoom: u8,
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for LocationMap {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            width_px: 1000,
            height_px: 500,
        }
    }
}

impl LocationMap {
    fn descriptor(&self, center: LatLong, marker: Option<Marker>) -> MapDescriptor {
        MapDescriptor {
            center,
            zoom: self.zoom,
            width_px: self.width_px,
            height_px: self.height_px,
            marker,
        }
    }
}

impl Projection for LocationMap {
    type Output = MapDescriptor;

    fn name(&self) -> &'static str {
        "location_map"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> MapDescriptor {
        let Some(row) = input.selected() else {
            return self.descriptor(self.default_center, None);
        };

        let position = LatLong {
            lat: row.location_lat.unwrap_or(self.default_center.lat),
            long: row.location_long.unwrap_or(self.default_center.long),
        };
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let name = text(&row.name);

        let marker = Marker {
            position,
            tooltip: name.clone(),
            popup: Popup {
                title: POPUP_TITLE.to_string(),
                name,
                animal_type: text(&row.animal_type),
                breed: text(&row.breed),
            },
        };
        self.descriptor(position, Some(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelterdash_core::prelude::AnimalRecord;
    use std::collections::BTreeSet;

    fn rows() -> Vec<AnimalRecord> {
        (0..3)
            .map(|i| AnimalRecord {
                name: Some(format!("dog-{i}")),
                animal_type: Some("Dog".into()),
                breed: Some(format!("breed-{i}")),
                location_lat: Some(30.0 + i as f64),
                location_long: Some(-97.0 - i as f64),
                ..Default::default()
            })
            .collect()
    }

    fn run(rows: &[AnimalRecord], selected: Option<usize>) -> MapDescriptor {
        let cols = BTreeSet::new();
        LocationMap::default().project(&ProjectionInput {
            visible_rows: rows,
            selected_row: selected,
            selected_columns: &cols,
        })
    }

    #[test]
    fn no_selection_gives_default_view() {
        let m = run(&rows(), None);
        assert_eq!(m.center, DEFAULT_CENTER);
        assert_eq!(m.zoom, 10);
        assert!(m.marker.is_none());
    }

    #[test]
    fn out_of_range_selection_gives_default_view() {
        let m = run(&rows(), Some(3));
        assert_eq!(m.center, LatLong { lat: 30.75, long: -97.48 });
        assert!(m.marker.is_none());
        assert!(run(&[], Some(0)).marker.is_none());
    }

    #[test]
    fn valid_selection_places_marker_on_that_row() {
        let m = run(&rows(), Some(1));
        let marker = m.marker.unwrap();
        assert_eq!(marker.position, LatLong { lat: 31.0, long: -98.0 });
        assert_eq!(m.center, marker.position);
        assert_eq!(marker.tooltip, "dog-1");
        let lines = marker.popup.lines();
        assert_eq!(lines[0], "Name: dog-1");
        assert_eq!(lines[1], "Type: Dog");
        assert_eq!(lines[2], "Breed: breed-1");
    }

    #[test]
    fn missing_fields_fall_back_individually() {
        let rows = vec![AnimalRecord {
            location_lat: Some(29.5),
            ..Default::default()
        }];
        let marker = run(&rows, Some(0)).marker.unwrap();
        assert_eq!(marker.position, LatLong { lat: 29.5, long: -97.48 });
        assert_eq!(marker.popup.name, UNKNOWN);
        assert_eq!(marker.popup.animal_type, UNKNOWN);
        assert_eq!(marker.popup.breed, UNKNOWN);
    }
}
