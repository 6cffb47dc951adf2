use std::cell::Cell;
use std::rc::Rc;

use boxbonk::*;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

const COIN: ColKey = 100;
const WALL: ColKey = 200;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = WorldConfig::from_json_str(
        r#"{ "world_width": 1600.0, "world_height": 900.0, "tree_size": 2048.0,
             "max_depth": 6, "candidate_source": "indexed" }"#,
    )
    .expect("valid config");
    let mut world = PhysicsWorld::new(cfg);

    // tiled floor, a low ledge, a coin block and a wall
    for i in 0..32 {
        let x = i as f32 * 50.0;
        world.add_collider(Collision2D::new(format!("tile_{i}"), Rect::new(x, 50.0, 100.0, 50.0)));
    }
    world.add_collider(Collision2D::new("ledge", Rect::new(300.0, 100.0, 108.0, 8.0)));
    world.add_collider(Collision2D::new("coin", Rect::new(520.0, 30.0, 160.0, 30.0)).with_tag(COIN));
    world.add_collider(Collision2D::new("wall", Rect::new(900.0, 40.0, 400.0, 300.0)).with_tag(WALL));

    let mut hero = RigidBody::new("hero", Rect::new(100.0, 20.0, 140.0, 20.0));
    hero.instance_velocity = Vec3::new(1.2, 0.0, 0.0);
    let landings = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&landings);
    hero.on_floor(move |_| seen.set(seen.get() + 1));
    hero.on_collision(|contacts, body| {
        for c in contacts {
            match c.other.as_ref().and_then(|o| o.tag()) {
                Some(WALL) => println!("{} hit the wall at {}", body.id(), body.bounds()),
                Some(COIN) => println!("{} bumped the coin block", body.id()),
                _ => {}
            }
        }
    });
    world.add_body(hero).expect("unique id");

    for frame in 0..240 {
        if frame == 60 {
            // jump under the coin block
            if let Some(hero) = world.body_mut("hero") {
                hero.velocity.y = 3.5;
            }
        }
        world.update(1.0 / 60.0);
        world.drain_events();
    }

    let hero = world.body("hero").expect("registered above");
    println!(
        "final {} landings={} stats={:?}",
        hero.bounds(),
        landings.get(),
        world.debug_stats()
    );
}
