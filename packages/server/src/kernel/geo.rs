//! Spatial index adapter over the H3 hexagonal cell system.
//!
//! The rest of the crate never touches `h3o` directly: it asks this adapter
//! for the cell of a coordinate, for the ring count approximating a radius,
//! and for the set of cells within that many rings. Cells cross the adapter
//! boundary as `i64` because that is how they are stored in Postgres.

use h3o::{CellIndex, LatLng, Resolution};

use crate::common::CoreError;

/// Average hexagon edge length in kilometers per H3 resolution (0-15).
///
/// Published H3 v4 averages (getHexagonEdgeLengthAvgKm). Pinned here so the
/// kilometer-radius to ring-count conversion is stable across `h3o` releases.
const AVG_EDGE_LENGTH_KM: [f64; 16] = [
    1281.256011,
    483.0568391,
    182.5129565,
    68.97922179,
    26.07175968,
    9.854090990,
    3.724532667,
    1.406475763,
    0.531414010,
    0.200786148,
    0.075863783,
    0.028663897,
    0.010830188,
    0.004092010,
    0.001546100,
    0.000584169,
];

/// Ceiling on the ring count produced from a kilometer radius. A disk of
/// `k` rings holds `3k^2 + 3k + 1` cells, all of which end up in one SQL
/// bind; 100 rings is ~30k cells (~281 km at resolution 7).
const MAX_RING_COUNT: u32 = 100;

/// Geospatial cell index at a fixed resolution.
#[derive(Debug, Clone, Copy)]
pub struct GeoIndex {
    resolution: Resolution,
}

impl GeoIndex {
    pub fn new(resolution: u8) -> Result<Self, CoreError> {
        let resolution = Resolution::try_from(resolution)
            .map_err(|_| CoreError::Config(format!("invalid H3 resolution: {resolution}")))?;
        Ok(Self { resolution })
    }

    pub fn resolution(&self) -> u8 {
        self.resolution.into()
    }

    /// Map a coordinate to its cell id at this index's resolution.
    ///
    /// Rejects coordinates outside [-90, 90] x [-180, 180]; `h3o` itself
    /// accepts any finite value and wraps it onto the sphere.
    pub fn cell_for(&self, latitude: f64, longitude: f64) -> Result<i64, CoreError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "invalid coordinate: ({latitude}, {longitude})"
            )));
        }
        let coord = LatLng::new(latitude, longitude).map_err(|_| {
            CoreError::Validation(format!("invalid coordinate: ({latitude}, {longitude})"))
        })?;
        Ok(u64::from(coord.to_cell(self.resolution)) as i64)
    }

    /// Average hex edge length in kilometers at this resolution.
    pub fn avg_edge_length_km(&self) -> f64 {
        AVG_EDGE_LENGTH_KM[u8::from(self.resolution) as usize]
    }

    /// Number of concentric cell rings needed to cover a kilometer radius.
    ///
    /// A cell spans roughly two edge lengths across, so the ring count is
    /// `floor(radius_km / (2 * avg_edge_length_km))`, clamped to
    /// `MAX_RING_COUNT`.
    pub fn ring_count(&self, radius_km: f64) -> u32 {
        let rings = (radius_km / (2.0 * self.avg_edge_length_km())).floor();
        if rings >= f64::from(MAX_RING_COUNT) {
            return MAX_RING_COUNT;
        }
        rings as u32
    }

    /// All cell ids within `rings` rings of the center cell, center included.
    /// Rings beyond `MAX_RING_COUNT` are clamped.
    pub fn cells_within_rings(&self, center: i64, rings: u32) -> Result<Vec<i64>, CoreError> {
        let rings = rings.min(MAX_RING_COUNT);
        let center = CellIndex::try_from(center as u64)
            .map_err(|_| CoreError::Validation(format!("invalid H3 cell id: {center}")))?;
        let cells: Vec<CellIndex> = center.grid_disk(rings);
        Ok(cells.into_iter().map(|c| u64::from(c) as i64).collect())
    }

    /// Convenience: cells covering `radius_km` around a coordinate.
    pub fn cells_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<i64>, CoreError> {
        let center = self.cell_for(latitude, longitude)?;
        self.cells_within_rings(center, self.ring_count(radius_km))
    }
}
