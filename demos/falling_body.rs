use boxbonk::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut world = PhysicsWorld::new(WorldConfig::default());
    world.add_collider(Collision2D::new("floor", Rect::new(0.0, 1000.0, 100.0, 100.0)));
    world
        .create_body(BodyDesc {
            id: "hero".into(),
            bounds: Rect::new(400.0, 20.0, 300.0, 20.0),
            mass: 10.0,
            active: true,
            tag: Some(1),
        })
        .expect("fresh world");

    for frame in 0..60 {
        world.update(1.0 / 60.0);
        for event in world.drain_events() {
            match event {
                PhysicsEvent::OnFloor { body, .. } => println!("frame {frame}: {body} landed"),
                PhysicsEvent::PositionChanged { body, position, .. } => {
                    println!("frame {frame}: {body} at y={:.4}m", position.y)
                }
                PhysicsEvent::Collision { .. } => {}
            }
        }
    }

    let hero = world.body("hero").expect("registered above");
    println!("resting bounds {} velocity {:?}", hero.bounds(), hero.velocity);
}
