//! Example: pack a slope cross-section with circles
//!
//! Run with `RUST_LOG=debug` to see mesh and packing timings.

use circle_pack::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Circle Packing Example");
    println!("======================\n");

    // Embankment cross-section: crest, slope face and toe
    let slope = [
        (0.0, 0.0),
        (30.0, 0.0),
        (30.0, 4.0),
        (22.0, 4.0),
        (12.0, 10.0),
        (0.0, 10.0),
    ];

    let config = PackingConfigBuilder::new()
        .max_triangle_area(6.0)?
        .max_depth(5)?
        .min_radius(0.05)?
        .min_radius_ratio(0.1)?
        .min_angle(20.0)?
        .build()?;

    println!("Configuration:");
    println!("  Max triangle area: {}", config.max_triangle_area);
    println!("  Max depth: {}", config.max_depth);
    println!("  Min radius: {}", config.min_radius);
    println!("  Min radius ratio: {}", config.min_radius_ratio);
    println!("  Min angle: {}", config.min_angle);
    println!();

    let packing = CirclePacking::generate(Polygon::from_xy(&slope)?, config)?;
    let stats = packing.stats();

    println!("Statistics:");
    println!("  Mesh triangles: {}", packing.triangles().len());
    println!("  Circles: {}", stats.count);
    println!(
        "  Radius min/mean/max: {:.4} / {:.4} / {:.4}",
        stats.radius_min, stats.radius_mean, stats.radius_max
    );
    println!("  Polygon area: {:.3}", stats.polygon_area);
    println!("  Circle area: {:.3}", stats.circle_area);
    println!("  Void ratio: {:.4}", stats.void_ratio);
    for (depth, count) in stats.depth_counts.iter().enumerate() {
        println!("  Depth {}: {} circles", depth, count);
    }
    println!();

    println!("First circles:");
    for record in export::to_records(&packing).iter().take(5) {
        println!(
            "  #{}: center=({:.3}, {:.3}), r={:.4}, depth={}, triangle={}",
            record.index, record.x, record.y, record.radius, record.depth, record.triangle
        );
    }

    #[cfg(feature = "spatial-index")]
    {
        let query = Point::new(5.0, 5.0);
        match packing.find_circle_at(query) {
            Some(i) => println!("\nPoint {:?} lies in circle {}", query, i),
            None => println!("\nPoint {:?} lies in the matrix (void)", query),
        }
    }

    let overlaps = packing.find_overlaps(1e-9);
    println!("\nOverlapping pairs: {}", overlaps.len());

    Ok(())
}
