//! Base layers offered to map viewers of a validated area of interest. Validation itself never uses them.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders, a provider keyword, or empty for no tiles.
    pub tile: &'static str,
    pub attr: &'static str,
}

pub fn base_tiles() -> BTreeMap<&'static str, TileLayer> {
    BTreeMap::from([
        (
            "ESRI-Imagen",
            TileLayer {
                tile: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                attr: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, \
                       Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
            },
        ),
        (
            "ESRI-Callejero",
            TileLayer {
                tile: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
                attr: "Tiles &copy; Esri &mdash; Source: Esri, DeLorme, NAVTEQ, USGS, Intermap, iPC, NRCAN, \
                       Esri Japan, METI, Esri China (Hong Kong), Esri (Thailand), TomTom, 2012",
            },
        ),
        (
            "Stamen Terrain",
            TileLayer {
                tile: "Stamen Terrain",
                attr: "Map tiles by <a href=\"http://stamen.com\">Stamen Design</a>, \
                       <a href=\"http://creativecommons.org/licenses/by/3.0\">CC BY 3.0</a> &mdash; \
                       Map data &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
            },
        ),
        ("Blank", TileLayer { tile: "", attr: "blank" }),
    ])
}
