//! Flat export of packing results
//!
//! Plain records for spreadsheets, numerical codes (DEM/FEM pre-processors)
//! and renderers. Nothing here is needed to compute a packing.

use std::io::{self, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::packing::CirclePacking;

/// One circle as a flat record
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleRecord {
    /// Position in the packing
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub depth: usize,
    /// Owning mesh triangle
    pub triangle: usize,
}

/// Engine-agnostic drawing data
///
/// - `boundary`: closed polygon ring (first point repeated at the end)
/// - `circles`: `[x, y, radius]` per circle, in packing order
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderData {
    pub boundary: Vec<[f64; 2]>,
    pub circles: Vec<[f64; 3]>,
}

impl RenderData {
    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}

/// Convert every circle of a packing into a record
pub fn to_records(packing: &CirclePacking) -> Vec<CircleRecord> {
    packing
        .circles()
        .iter()
        .enumerate()
        .map(|(index, c)| CircleRecord {
            index,
            x: c.center.x,
            y: c.center.y,
            radius: c.radius,
            depth: c.depth,
            triangle: c.triangle,
        })
        .collect()
}

/// Write one whitespace-separated line per circle
///
/// Format: a `#` header line, then `index x y radius depth triangle`.
/// Floats use Rust's shortest round-trip formatting, so reading the file
/// back gives bit-identical values.
pub fn write_records<W: Write>(packing: &CirclePacking, mut writer: W) -> io::Result<()> {
    writeln!(writer, "# index x y radius depth triangle")?;
    for r in to_records(packing) {
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            r.index, r.x, r.y, r.radius, r.depth, r.triangle
        )?;
    }
    writer.flush()
}

/// Collect the boundary and circles for a renderer
pub fn render_data(packing: &CirclePacking) -> RenderData {
    RenderData {
        boundary: packing
            .polygon()
            .closed_ring()
            .iter()
            .map(|p| [p.x, p.y])
            .collect(),
        circles: packing
            .circles()
            .iter()
            .map(|c| [c.center.x, c.center.y, c.radius])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packing() -> CirclePacking {
        CirclePacking::run(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], 100.0, 1, 0.0).unwrap()
    }

    #[test]
    fn test_records() {
        let packing = packing();
        let records = to_records(&packing);
        assert_eq!(records.len(), packing.circle_count());
        for (record, circle) in records.iter().zip(packing.circles()) {
            assert_eq!(record.x, circle.center.x);
            assert_eq!(record.radius, circle.radius);
            assert_eq!(record.depth, circle.depth);
        }
        assert_eq!(records[3].index, 3);
    }

    #[test]
    fn test_write_records_round_trip() {
        let packing = packing();
        let mut buffer = Vec::new();
        write_records(&packing, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with('#'));
        let rows: Vec<Vec<&str>> = lines.map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(rows.len(), packing.circle_count());

        for (row, circle) in rows.iter().zip(packing.circles()) {
            assert_eq!(row.len(), 6);
            assert_eq!(row[1].parse::<f64>().unwrap(), circle.center.x);
            assert_eq!(row[2].parse::<f64>().unwrap(), circle.center.y);
            assert_eq!(row[3].parse::<f64>().unwrap(), circle.radius);
            assert_eq!(row[4].parse::<usize>().unwrap(), circle.depth);
            assert_eq!(row[5].parse::<usize>().unwrap(), circle.triangle);
        }
    }

    #[test]
    fn test_render_data() {
        let data = render_data(&packing());
        assert_eq!(data.boundary.len(), 5);
        assert_eq!(data.boundary.first(), data.boundary.last());
        assert_eq!(data.circle_count(), 8);
        assert!(!data.is_empty());
        assert!(RenderData::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_serialization() {
        let records = to_records(&packing());
        let json = serde_json::to_string(&records).unwrap();
        let restored: Vec<CircleRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), restored.len());
        for (a, b) in records.iter().zip(&restored) {
            assert_eq!((a.index, a.depth, a.triangle), (b.index, b.depth, b.triangle));
            assert!((a.radius - b.radius).abs() <= 1e-15 * a.radius);
        }
    }
}
