//! Coordinate type definitions

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Mean spherical earth radius used for great-circle math, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic rectangle spanned by a northwest and a southeast corner.
///
/// For the supported case (no antimeridian crossing) `nw.lat > se.lat`
/// and `nw.lon < se.lon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Northwest corner
    pub nw: GeoPoint,
    /// Southeast corner
    pub se: GeoPoint,
}

impl BoundingBox {
    /// Longitude span in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.se.lon - self.nw.lon
    }

    /// Latitude span in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.se.lat - self.nw.lat
    }
}

/// Slippy-map tile index.
///
/// Serialized as `"zoom/x/y"`. Ordering follows that string form so that a
/// sorted batch is deterministic and matches a lexicographic sort of the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TilePosition {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (west to east)
    pub x: u32,
    /// Y coordinate (north to south)
    pub y: u32,
}

impl TilePosition {
    #[inline]
    pub const fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Tile directly below this one.
    #[inline]
    pub fn south(&self) -> Self {
        Self::new(self.zoom, self.x, self.y + 1)
    }

    /// Tile directly to the right of this one.
    #[inline]
    pub fn east(&self) -> Self {
        Self::new(self.zoom, self.x + 1, self.y)
    }

    /// Tile diagonally below and to the right.
    #[inline]
    pub fn south_east(&self) -> Self {
        Self::new(self.zoom, self.x + 1, self.y + 1)
    }

    /// The `"zoom/x/y"` key for this tile.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

impl FromStr for TilePosition {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordError::MalformedPosition(s.to_string());

        let mut parts = s.split('/');
        let (Some(zoom), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        Ok(Self {
            zoom: zoom.trim().parse().map_err(|_| malformed())?,
            x: x.trim().parse().map_err(|_| malformed())?,
            y: y.trim().parse().map_err(|_| malformed())?,
        })
    }
}

impl PartialOrd for TilePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TilePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Errors that can occur while handling coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Position string is not of the form `zoom/x/y`
    #[error("Malformed tile position: '{0}' (expected zoom/x/y)")]
    MalformedPosition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_position_display() {
        let tile = TilePosition::new(12, 655, 1583);
        assert_eq!(tile.to_string(), "12/655/1583");
    }

    #[test]
    fn test_tile_position_parse() {
        let tile: TilePosition = "12/655/1583".parse().unwrap();
        assert_eq!(tile, TilePosition::new(12, 655, 1583));
    }

    #[test]
    fn test_tile_position_parse_rejects_malformed() {
        for bad in ["", "12/655", "12/655/1583/1", "a/b/c", "12/-1/3", "300/1/1"] {
            let result = bad.parse::<TilePosition>();
            assert!(
                matches!(result, Err(CoordError::MalformedPosition(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_tile_position_orders_like_its_key() {
        let mut tiles = vec![
            TilePosition::new(10, 100, 5),
            TilePosition::new(10, 99, 5),
            TilePosition::new(10, 100, 10),
        ];
        tiles.sort();

        let keys: Vec<_> = tiles.iter().map(TilePosition::key).collect();
        assert_eq!(keys, vec!["10/100/10", "10/100/5", "10/99/5"]);
    }

    #[test]
    fn test_neighbors() {
        let tile = TilePosition::new(8, 10, 20);
        assert_eq!(tile.south(), TilePosition::new(8, 10, 21));
        assert_eq!(tile.east(), TilePosition::new(8, 11, 20));
        assert_eq!(tile.south_east(), TilePosition::new(8, 11, 21));
    }
}
