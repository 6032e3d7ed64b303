//! Coordinate conversion module
//!
//! Provides the geodesy used to turn an origin and a radius into a set of
//! slippy-map tiles: great-circle destination points, bounding boxes, and
//! conversions between geographic coordinates and Web Mercator tile/pixel
//! indices.
//!
//! All math assumes a sphere of radius [`EARTH_RADIUS_KM`]. Boxes that cross
//! the antimeridian or reach the poles are not supported.

mod types;

pub use types::{BoundingBox, CoordError, GeoPoint, TilePosition, EARTH_RADIUS_KM};

use std::f64::consts::PI;

/// Computes the point reached by travelling `distance_km` from (`lat`, `lon`)
/// along the initial great-circle bearing `bearing_deg`.
///
/// Inputs and output are in degrees. No clamping is applied.
pub fn destination_point(lat: f64, lon: f64, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Great-circle (haversine) distance between two points, in kilometres.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.lon - from.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial great-circle bearing from `from` towards `to`, in degrees `[0, 360)`.
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Builds the bounding box whose corners lie `radius_km` from the origin
/// along bearings -45° (northwest) and 135° (southeast).
///
/// Valid only for small radii away from the poles and the antimeridian.
pub fn bounding_box_from_origin(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    BoundingBox {
        nw: destination_point(lat, lon, radius_km, -45.0),
        se: destination_point(lat, lon, radius_km, 135.0),
    }
}

/// Converts a longitude to its tile X index at `zoom`.
#[inline]
pub fn lon_to_tile_x(lon: f64, zoom: u8) -> u32 {
    let n = 2.0_f64.powi(zoom as i32);
    ((lon + 180.0) / 360.0 * n).floor() as u32
}

/// Converts a latitude to its tile Y index at `zoom` (Web Mercator).
#[inline]
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> u32 {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat * PI / 180.0;
    ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as u32
}

/// Corner tile indices `(x1, y1, x2, y2)` of `bbox` at `zoom`.
fn tile_span(bbox: &BoundingBox, zoom: u8) -> (u32, u32, u32, u32) {
    (
        lon_to_tile_x(bbox.nw.lon, zoom),
        lat_to_tile_y(bbox.nw.lat, zoom),
        lon_to_tile_x(bbox.se.lon, zoom),
        lat_to_tile_y(bbox.se.lat, zoom),
    )
}

/// Number of tiles [`enumerate_tiles`] would return, without allocating.
///
/// Zero when the box is inverted. `None` if the count overflows `usize`.
pub fn count_tiles(bbox: &BoundingBox, zoom: u8) -> Option<usize> {
    let (x1, y1, x2, y2) = tile_span(bbox, zoom);
    if x2 < x1 || y2 < y1 {
        return Some(0);
    }

    let columns = usize::try_from(u64::from(x2 - x1) + 1).ok()?;
    let rows = usize::try_from(u64::from(y2 - y1) + 1).ok()?;
    columns.checked_mul(rows)
}

/// Lists every tile covering `bbox` at `zoom`, row-major (y outer, x inner).
///
/// Returns an empty list when the southeast corner maps to a smaller index
/// than the northwest corner; callers treat that as an error.
pub fn enumerate_tiles(bbox: &BoundingBox, zoom: u8) -> Vec<TilePosition> {
    let (x1, y1, x2, y2) = tile_span(bbox, zoom);

    (y1..=y2)
        .flat_map(|y| (x1..=x2).map(move |x| TilePosition::new(zoom, x, y)))
        .collect()
}

/// Converts global pixel coordinates at `zoom` to a geographic point.
///
/// `tile_size` is the raster edge length of one tile, so the world is
/// `tile_size * 2^zoom` pixels wide. Pixel (0, 0) is the northwest corner of
/// the world.
pub fn pixel_to_lon_lat(px: f64, py: f64, zoom: u8, tile_size: u32) -> GeoPoint {
    let world = tile_size as f64 * 2.0_f64.powi(zoom as i32);

    let lon = px / world * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * py / world)).sinh().atan().to_degrees();

    GeoPoint::new(lat, lon)
}

/// Geographic location of pixel (`row`, `col`) inside `tile`.
#[inline]
pub fn tile_pixel_to_lon_lat(tile: &TilePosition, row: u32, col: u32, tile_size: u32) -> GeoPoint {
    let px = tile.x as f64 * tile_size as f64 + col as f64;
    let py = tile.y as f64 * tile_size as f64 + row as f64;
    pixel_to_lon_lat(px, py, tile.zoom, tile_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_tile_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        assert_eq!(lon_to_tile_x(-74.0060, 16), 19295);
        assert_eq!(lat_to_tile_y(40.7128, 16), 24640);
    }

    #[test]
    fn test_count_tiles_matches_enumeration() {
        let bbox = bounding_box_from_origin(46.55, 7.98, 3.0);
        for zoom in [10, 13, 15] {
            assert_eq!(
                count_tiles(&bbox, zoom),
                Some(enumerate_tiles(&bbox, zoom).len())
            );
        }
    }

    #[test]
    fn test_count_tiles_of_inverted_box_is_zero() {
        let bbox = BoundingBox {
            nw: GeoPoint::new(46.0, 8.0),
            se: GeoPoint::new(47.0, 7.0),
        };
        assert_eq!(count_tiles(&bbox, 12), Some(0));
        assert!(enumerate_tiles(&bbox, 12).is_empty());
    }

    #[test]
    fn test_count_tiles_of_continental_box_needs_no_enumeration() {
        let bbox = bounding_box_from_origin(10.0, 0.0, 2500.0);
        let count = count_tiles(&bbox, 15).unwrap();
        assert!(count > 8_000_000);
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        assert_eq!(lon_to_tile_x(-179.0, 0), 0);
        assert_eq!(lon_to_tile_x(179.0, 0), 0);
        assert_eq!(lat_to_tile_y(80.0, 0), 0);
        assert_eq!(lat_to_tile_y(-80.0, 0), 0);
    }

    #[test]
    fn test_destination_point_due_north() {
        // One degree of arc on a 6373 km sphere
        let one_degree_km = EARTH_RADIUS_KM * PI / 180.0;
        let point = destination_point(10.0, 20.0, one_degree_km, 0.0);

        assert!((point.lat - 11.0).abs() < 1e-9);
        assert!((point.lon - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_destination_point_zero_distance() {
        let point = destination_point(46.5, 7.9, 0.0, 123.0);
        assert!((point.lat - 46.5).abs() < 1e-12);
        assert!((point.lon - 7.9).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_corners() {
        let bbox = bounding_box_from_origin(46.5, 7.9, 5.0);
        let origin = GeoPoint::new(46.5, 7.9);

        assert!(bbox.nw.lat > bbox.se.lat);
        assert!(bbox.nw.lon < bbox.se.lon);
        assert!((distance_km(origin, bbox.nw) - 5.0).abs() < 1e-6);
        assert!((distance_km(origin, bbox.se) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_enumerate_single_tile() {
        // Small box well inside tile 12/2137/1446
        let center = tile_pixel_to_lon_lat(&TilePosition::new(12, 2137, 1446), 256, 256, 512);
        let bbox = bounding_box_from_origin(center.lat, center.lon, 0.5);

        let tiles = enumerate_tiles(&bbox, 12);
        assert_eq!(tiles, vec![TilePosition::new(12, 2137, 1446)]);
    }

    #[test]
    fn test_enumerate_grid_is_row_major() {
        // Box from the middle of tile (10, 20) to the middle of tile (12, 21)
        let zoom = 6;
        let nw = tile_pixel_to_lon_lat(&TilePosition::new(zoom, 10, 20), 100, 100, 256);
        let se = tile_pixel_to_lon_lat(&TilePosition::new(zoom, 12, 21), 100, 100, 256);
        let bbox = BoundingBox { nw, se };

        let tiles = enumerate_tiles(&bbox, zoom);
        let expected: Vec<_> = [(10, 20), (11, 20), (12, 20), (10, 21), (11, 21), (12, 21)]
            .into_iter()
            .map(|(x, y)| TilePosition::new(zoom, x, y))
            .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn test_enumerate_inverted_box_is_empty() {
        let bbox = BoundingBox {
            nw: GeoPoint::new(40.0, 10.0),
            se: GeoPoint::new(41.0, 9.0),
        };
        assert!(enumerate_tiles(&bbox, 10).is_empty());
    }

    #[test]
    fn test_tile_pixel_origin_matches_tile_corner() {
        let tile = TilePosition::new(10, 512, 512);
        let corner = tile_pixel_to_lon_lat(&tile, 0, 0, 512);

        assert!(corner.lat.abs() < 1e-9, "Should be on the equator");
        assert!(corner.lon.abs() < 1e-9, "Should be on the prime meridian");
    }

    #[test]
    fn test_tile_pixel_maps_back_to_same_tile() {
        let tile = TilePosition::new(14, 8508, 5814);
        let point = tile_pixel_to_lon_lat(&tile, 300, 17, 512);

        assert_eq!(lon_to_tile_x(point.lon, 14), tile.x);
        assert_eq!(lat_to_tile_y(point.lat, 14), tile.y);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_destination_distance_roundtrip(
                lat in -70.0..70.0_f64,
                lon in -170.0..170.0_f64,
                distance in 0.01..500.0_f64,
                bearing in -180.0..180.0_f64
            ) {
                let origin = GeoPoint::new(lat, lon);
                let dest = destination_point(lat, lon, distance, bearing);
                let back = distance_km(origin, dest);

                prop_assert!(
                    (back - distance).abs() < 1e-6 * distance.max(1.0),
                    "Distance roundtrip failed: {} -> {}",
                    distance, back
                );
            }

            #[test]
            fn test_destination_bearing_roundtrip(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                distance in 1.0..200.0_f64,
                bearing in 0.0..360.0_f64
            ) {
                let origin = GeoPoint::new(lat, lon);
                let dest = destination_point(lat, lon, distance, bearing);
                let back = initial_bearing(origin, dest);

                let diff = (back - bearing).abs();
                let diff = diff.min(360.0 - diff);
                prop_assert!(diff < 1e-6, "Bearing roundtrip failed: {} -> {}", bearing, back);
            }

            #[test]
            fn test_enumerate_covers_rectangle(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                radius in 0.5..20.0_f64,
                zoom in 8u8..=13
            ) {
                let bbox = bounding_box_from_origin(lat, lon, radius);
                let tiles = enumerate_tiles(&bbox, zoom);

                let cols = lon_to_tile_x(bbox.se.lon, zoom) - lon_to_tile_x(bbox.nw.lon, zoom) + 1;
                let rows = lat_to_tile_y(bbox.se.lat, zoom) - lat_to_tile_y(bbox.nw.lat, zoom) + 1;
                prop_assert_eq!(tiles.len() as u32, cols * rows);

                for pair in tiles.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    prop_assert!((a.y, a.x) < (b.y, b.x), "Not row-major: {} then {}", a, b);
                }
            }
        }
    }
}
