// Map Projector - view state and scatterplot markers for the filtered set

use crate::filter::FilteredView;
use crate::record::Record;
use serde::Serialize;

pub const DEFAULT_ZOOM: u8 = 7;
pub const DEFAULT_PITCH: f64 = 0.0;
pub const MARKER_RADIUS_METERS: f64 = 4000.0;
pub const MARKER_FILL: Rgba = Rgba(0, 100, 255, 180);
pub const LAYER_KIND: &str = "ScatterplotLayer";
pub const TOOLTIP_TEXT_COLOR: &str = "white";

/// Notice shown in place of the map when nothing matches.
pub const EMPTY_MAP_NOTICE: &str = "Tidak ada data UMKM sesuai filter.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.0, self.1, self.2, self.3].serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Record name, used as a plain-text label by adapters that
    /// cannot show HTML tooltips.
    pub label: String,
    /// `[longitude, latitude]`
    pub position: [f64; 2],
    pub radius_meters: f64,
    pub fill_color: Rgba,
    pub tooltip_html: String,
    pub pickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub layer: &'static str,
    pub view_state: ViewState,
    pub markers: Vec<MapMarker>,
    pub tooltip_color: &'static str,
}

/// Result of projecting a filtered view onto the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapProjection {
    Ready(MapView),
    /// Zero matching records: render [`EMPTY_MAP_NOTICE`] instead of a map.
    Empty,
}

impl MapProjection {
    pub fn is_empty(&self) -> bool {
        matches!(self, MapProjection::Empty)
    }

    pub fn view(&self) -> Option<&MapView> {
        match self {
            MapProjection::Ready(view) => Some(view),
            MapProjection::Empty => None,
        }
    }
}

/// Marker style and camera settings applied to every projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjector {
    pub zoom: u8,
    pub pitch: f64,
    pub radius_meters: f64,
    pub fill_color: Rgba,
}

impl Default for MapProjector {
    fn default() -> Self {
        MapProjector {
            zoom: DEFAULT_ZOOM,
            pitch: DEFAULT_PITCH,
            radius_meters: MARKER_RADIUS_METERS,
            fill_color: MARKER_FILL,
        }
    }
}

impl MapProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, filtered: &FilteredView) -> MapProjection {
        if filtered.is_empty() {
            return MapProjection::Empty;
        }

        let n = filtered.len() as f64;
        let latitude = filtered.iter().map(|r| r.latitude).sum::<f64>() / n;
        let longitude = filtered.iter().map(|r| r.longitude).sum::<f64>() / n;

        let markers = filtered.iter().map(|r| self.marker(r)).collect();

        MapProjection::Ready(MapView {
            layer: LAYER_KIND,
            view_state: ViewState {
                latitude,
                longitude,
                zoom: self.zoom,
                pitch: self.pitch,
            },
            markers,
            tooltip_color: TOOLTIP_TEXT_COLOR,
        })
    }

    fn marker(&self, record: &Record) -> MapMarker {
        MapMarker {
            label: record.name.clone(),
            position: record.position(),
            radius_meters: self.radius_meters,
            fill_color: self.fill_color,
            tooltip_html: tooltip_html(record),
            pickable: true,
        }
    }
}

/// Tooltip body for one record. Field values are escaped so loaded data
/// cannot inject markup into the page.
pub fn tooltip_html(record: &Record) -> String {
    format!(
        "<b>{}</b><br/>Kategori: {}<br/>Kabupaten: {}<br/>Alamat: {}",
        escape_html(&record.name),
        escape_html(&record.category),
        escape_html(&record.regency),
        escape_html(&record.address),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
