use std::time::Instant;

use boxbonk::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn main() {
    let size = 10_000.0;
    let n = 20_000usize;
    let mut seed = 1u32;

    let mut tree = QuadTree::new(size, 8);
    let mut linear = LinearIndex::new();
    for i in 0..n {
        let c = Collision2D::new(
            format!("box_{i}"),
            Rect::new(unit(&mut seed) * size, 8.0 + unit(&mut seed) * 40.0, unit(&mut seed) * size, 8.0 + unit(&mut seed) * 40.0),
        );
        tree.add_collision(c.clone());
        linear.add_collision(c);
    }
    println!("tree: {:?}", tree.debug_stats());

    let probes: Vec<Collision2D> = (0..1000)
        .map(|i| {
            Collision2D::new(
                format!("probe_{i}"),
                Rect::new(unit(&mut seed) * size, 64.0, unit(&mut seed) * size, 64.0),
            )
        })
        .collect();

    let mut tree_stats = QueryAnalytics::default();
    let t0 = Instant::now();
    let mut tree_hits = 0;
    for p in &probes {
        tree_hits += tree.query(p, Some(&mut tree_stats)).len();
    }
    let t_tree = t0.elapsed();

    let mut linear_stats = QueryAnalytics::default();
    let t1 = Instant::now();
    let mut linear_hits = 0;
    let mut out = Vec::new();
    for p in &probes {
        out.clear();
        linear.check_for_collision(p, &mut out, Some(&mut linear_stats));
        linear_hits += out.len();
    }
    let t_linear = t1.elapsed();

    assert_eq!(tree_hits, linear_hits);
    println!(
        "N={} probes={} hits={} tree={:.3}ms ({:?}) linear={:.3}ms ({:?})",
        n,
        probes.len(),
        tree_hits,
        t_tree.as_secs_f64() * 1000.0,
        tree_stats,
        t_linear.as_secs_f64() * 1000.0,
        linear_stats
    );
}
