//! Example: recursive packing of a single triangle
//!
//! Prints the circle tree level by level and writes the flat record format
//! to stdout.

use circle_pack::*;

fn main() {
    env_logger::init();

    let triangle = Triangle::new(Point::new(2.0, 1.0), Point::new(6.0, 1.0), Point::new(4.0, 5.5));
    println!("Triangle area: {:.4}", triangle.area());

    for depth in 0..=4 {
        let circles = RecursivePacker::new(depth, 0.0).pack(&triangle, 0);
        let covered: f64 = circles.iter().map(Circle::area).sum();
        println!(
            "  depth {}: {:>4} circles, coverage {:.2}%",
            depth,
            circles.len(),
            100.0 * covered / triangle.area()
        );
    }

    println!("\nindex x y radius depth");
    let circles = RecursivePacker::new(2, 0.0).pack(&triangle, 0);
    for (i, c) in circles.iter().enumerate() {
        println!("{} {:.6} {:.6} {:.6} {}", i, c.center.x, c.center.y, c.radius, c.depth);
    }
}
