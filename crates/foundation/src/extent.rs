/// Visible map bounding box in projected (EPSG:3857) coordinates.
///
/// Supplied by the map view at request time; never persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl MapExtent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A square extent centered on `center` with the given half-size.
    pub fn around(center: crate::screen::Coordinate, half_size: f64) -> Self {
        Self {
            min_x: center.x - half_size,
            min_y: center.y - half_size,
            max_x: center.x + half_size,
            max_y: center.y + half_size,
        }
    }

    /// Comma-joined `minx,miny,maxx,maxy` exactly as the feature server
    /// expects it inside a `bbox=` query value.
    pub fn to_bbox_value(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::MapExtent;

    #[test]
    fn bbox_value_uses_shortest_float_form() {
        let e = MapExtent::new(100.0, 200.0, 300.0, 400.0);
        assert_eq!(e.to_bbox_value(), "100,200,300,400");
    }

    #[test]
    fn bbox_value_keeps_fractions() {
        let e = MapExtent::new(0.5, -1.25, 2.0, 3.0);
        assert_eq!(e.to_bbox_value(), "0.5,-1.25,2,3");
    }
}
