//! Scatter obstacles on a grid and compare flat, JPS and HPA* paths.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tilepath::{DiagonalMode, GridPathfinder, Heuristic};
use tilepath_core::{Point, Range};

const WIDTH: i32 = 60;
const HEIGHT: i32 = 30;
const WALL_PERCENT: i32 = 22;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pf = GridPathfinder::new();
    pf.set_region(Point::ZERO, Point::new(WIDTH, HEIGHT))?;
    pf.set_diagonal_mode(DiagonalMode::OnlyIfNoObstacles);
    pf.set_default_compute_heuristic(Heuristic::Octile);
    pf.set_default_estimate_heuristic(Heuristic::Octile);
    pf.update();

    let mut rng = StdRng::seed_from_u64(42);
    for p in pf.region() {
        if rng.random_range(0..100) < WALL_PERCENT {
            pf.set_point_solid(p, true)?;
        }
    }
    // Keep the corners open.
    let from = Point::new(1, 1);
    let to = Point::new(WIDTH - 2, HEIGHT - 2);
    pf.fill_solid_region(Range::new(0, 0, 3, 3), false)?;
    pf.fill_solid_region(Range::new(WIDTH - 3, HEIGHT - 3, WIDTH, HEIGHT), false)?;

    let flat = pf.get_id_path(from, to);
    report(&pf, "A*", &flat);

    pf.set_jumping_enabled(true);
    let jumps = pf.get_id_path(from, to);
    println!("JPS: {} jump points", jumps.len());
    pf.set_jumping_enabled(false);

    pf.set_hpa_enabled(true)?;
    pf.update_hpa()?;
    if let Some(stats) = pf.hpa_stats() {
        println!(
            "HPA* graph: {} levels, {} clusters, {} nodes, {} edges",
            stats.levels, stats.clusters, stats.nodes, stats.edges
        );
    }
    let hpa = pf.get_id_path(from, to);
    report(&pf, "HPA*", &hpa);

    draw(&pf, &flat, &hpa);
    Ok(())
}

fn report(pf: &GridPathfinder, name: &str, path: &[Point]) {
    if path.is_empty() {
        println!("{name}: no path");
        return;
    }
    let cost: f32 = path.windows(2).map(|w| pf.compute_cost(w[0], w[1])).sum();
    println!("{name}: {} cells, cost {cost:.2}", path.len());
}

/// `*` marks cells on both paths, `a` only on the flat one, `h` only on the
/// hierarchical one.
fn draw(pf: &GridPathfinder, flat: &[Point], hpa: &[Point]) {
    for y in 0..HEIGHT {
        let row: String = (0..WIDTH)
            .map(|x| {
                let p = Point::new(x, y);
                match (flat.contains(&p), hpa.contains(&p)) {
                    (true, true) => '*',
                    (true, false) => 'a',
                    (false, true) => 'h',
                    _ if pf.is_point_solid(p).unwrap_or(true) => '#',
                    _ => '.',
                }
            })
            .collect();
        println!("{row}");
    }
}
