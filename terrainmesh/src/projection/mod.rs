//! Local flat-plane projection into the render box.
//!
//! Longitude and latitude are mapped linearly onto a square of edge length
//! `render_box_size` centred on the origin:
//!
//! ```text
//!            nw.lon            se.lon
//!   nw.lat ┌──────────────────┐  y = +s/2
//!          │                  │
//!          │      (0, 0)      │
//!          │                  │
//!   se.lat └──────────────────┘  y = -s/2
//!        x = -s/2            x = +s/2
//! ```
//!
//! The mapping is only meaningful close to the origin; it ignores the
//! curvature of the earth and the Mercator stretch inside the box.

use crate::coord::{BoundingBox, GeoPoint};

/// Bidirectional lon/lat ↔ render-box mapping for one assembly run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bbox: BoundingBox,
    render_box_size: f64,
    units_per_meter: f64,
}

impl Projection {
    /// Creates the projection for `bbox`, which was built with `radius_km`.
    ///
    /// `units_per_meter` is `render_box_size / (radius_km · 1000 · √2)`: the
    /// box corners sit `radius_km` from the origin, so the box edge is
    /// `radius_km · √2` long.
    pub fn new(bbox: BoundingBox, radius_km: f64, render_box_size: f64) -> Self {
        let units_per_meter = render_box_size / (radius_km * 1000.0 * std::f64::consts::SQRT_2);
        Self {
            bbox,
            render_box_size,
            units_per_meter,
        }
    }

    /// Scale converting metres (elevation) into render-box units.
    #[inline]
    pub fn units_per_meter(&self) -> f64 {
        self.units_per_meter
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn render_box_size(&self) -> f64 {
        self.render_box_size
    }

    /// Maps a geographic point to render-box X/Y.
    #[inline]
    pub fn lon_lat_to_xy(&self, point: GeoPoint) -> (f64, f64) {
        let BoundingBox { nw, se } = self.bbox;
        let s = self.render_box_size;

        let x = s * (-0.5 + (point.lon - nw.lon) / (se.lon - nw.lon));
        let y = s * (-0.5 - (point.lat - se.lat) / (se.lat - nw.lat));
        (x, y)
    }

    /// Maps render-box X/Y back to a geographic point.
    #[inline]
    pub fn xy_to_lon_lat(&self, x: f64, y: f64) -> GeoPoint {
        let BoundingBox { nw, se } = self.bbox;
        let s = self.render_box_size;

        let lon = (x / s + 0.5) * (se.lon - nw.lon) + nw.lon;
        let lat = se.lat - (y / s + 0.5) * (se.lat - nw.lat);
        GeoPoint::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::bounding_box_from_origin;

    fn alps() -> Projection {
        let bbox = bounding_box_from_origin(46.5, 7.9, 5.0);
        Projection::new(bbox, 5.0, 2.0)
    }

    #[test]
    fn test_corners_map_to_box_edges() {
        let projection = alps();
        let bbox = *projection.bbox();

        let (x, y) = projection.lon_lat_to_xy(bbox.nw);
        assert!((x + 1.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);

        let (x, y) = projection.lon_lat_to_xy(bbox.se);
        assert!((x - 1.0).abs() < 1e-12);
        assert!((y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_box_center_maps_to_origin() {
        let projection = alps();
        let bbox = projection.bbox();
        let center = GeoPoint::new(
            (bbox.nw.lat + bbox.se.lat) / 2.0,
            (bbox.nw.lon + bbox.se.lon) / 2.0,
        );

        let (x, y) = projection.lon_lat_to_xy(center);
        assert!(x.abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }

    #[test]
    fn test_units_per_meter() {
        let projection = alps();
        let expected = 2.0 / (5000.0 * 2.0_f64.sqrt());
        assert!((projection.units_per_meter() - expected).abs() < 1e-15);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_xy_roundtrip(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                radius in 0.5..50.0_f64,
                size in 0.1..1000.0_f64,
                x in -0.5..0.5_f64,
                y in -0.5..0.5_f64
            ) {
                let bbox = bounding_box_from_origin(lat, lon, radius);
                let projection = Projection::new(bbox, radius, size);

                let point = projection.xy_to_lon_lat(x * size, y * size);
                let (x2, y2) = projection.lon_lat_to_xy(point);

                prop_assert!((x2 - x * size).abs() < 1e-9 * size);
                prop_assert!((y2 - y * size).abs() < 1e-9 * size);
            }

            #[test]
            fn test_lon_lat_roundtrip(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                radius in 0.5..50.0_f64,
                u in 0.0..1.0_f64,
                v in 0.0..1.0_f64
            ) {
                let bbox = bounding_box_from_origin(lat, lon, radius);
                let projection = Projection::new(bbox, radius, 1.0);
                let point = GeoPoint::new(
                    bbox.se.lat + v * (bbox.nw.lat - bbox.se.lat),
                    bbox.nw.lon + u * (bbox.se.lon - bbox.nw.lon),
                );

                let (x, y) = projection.lon_lat_to_xy(point);
                let back = projection.xy_to_lon_lat(x, y);

                prop_assert!((back.lat - point.lat).abs() < 1e-9);
                prop_assert!((back.lon - point.lon).abs() < 1e-9);
            }
        }
    }
}
