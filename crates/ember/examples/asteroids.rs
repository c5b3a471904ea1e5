//! Asteroids: physics at 50 Hz, rendering at whatever the display allows.
//!
//! Arrow keys steer the ship. Asteroids drift in every few seconds and wrap
//! around the screen edges. The red button (or R) clears the field. Escape
//! quits.
//!
//! Every body is drawn at its interpolated pose, so motion stays smooth even
//! though the simulation only ticks 50 times a second.

use ember::math::{direction_from_degrees, move_towards, move_towards_vec2};
use ember::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SPAWN_INTERVAL_SECS: f32 = 3.0;
const ASTEROID_SPEED: f32 = 4.0;
const SHIP_SPEED: f32 = 4.0;
const SHIP_TURN_RATE: f32 = 480.0;

struct Ship {
    body: BodyHandle,
    sprite: Sprite,
}

#[derive(Clone, Copy)]
struct AsteroidKind {
    size: f32,
    frames: [Sprite; 3],
}

struct Asteroid {
    body: BodyHandle,
    sprite: Sprite,
    size: f32,
}

struct Field {
    kinds: Vec<AsteroidKind>,
    asteroids: Vec<Asteroid>,
    last_spawn_secs: f32,
    rng: StdRng,
    clear_button: Option<NodeId>,
}

fn main() -> ember::Result<()> {
    Game::new("ember asteroids")
        .plugin(Physics2d)
        .setup(setup)
        .update(steer_ship)
        .update(spawn_asteroids)
        .update(clear_field)
        .post_fixed(wrap_around)
        .draw(draw_bodies)
        .run()
}

// ── Procedural art ──────────────────────────────────────────────────────

/// RGBA8 pixels, top row first, from a coverage function over bottom-up
/// UVs in `[0, 1]`.
fn paint(size: u32, color: [u8; 3], covered: impl Fn(f32, f32) -> bool) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for row in 0..size {
        for col in 0..size {
            let u = (col as f32 + 0.5) / size as f32;
            let v = 1.0 - (row as f32 + 0.5) / size as f32;
            let alpha = if covered(u, v) { 255 } else { 0 };
            pixels.extend_from_slice(&[color[0], color[1], color[2], alpha]);
        }
    }
    pixels
}

/// A triangle pointing along +x.
fn ship_pixels() -> Vec<u8> {
    paint(32, [235, 235, 255], |u, v| (v - 0.5).abs() < 0.5 * (1.0 - u))
}

/// A 3x3 atlas of lumpy discs, one row per asteroid size, one column per
/// variant.
fn asteroid_atlas(cell: u32) -> Vec<u8> {
    let size = cell * 3;
    paint(size, [150, 140, 130], |u, v| {
        let (cu, cv) = ((u * 3.0).fract(), (v * 3.0).fract());
        let variant = (u * 3.0).floor();
        let (dx, dy) = (cu - 0.5, cv - 0.5);
        let angle = dy.atan2(dx);
        let radius = 0.4 + 0.05 * (angle * (3.0 + variant) + variant).sin();
        (dx * dx + dy * dy).sqrt() < radius
    })
}

// ── Systems ─────────────────────────────────────────────────────────────

fn setup(ctx: &mut Context) {
    ctx.camera.set_size(3.0);

    let textures = ctx.create_texture("ship", 32, 32, &ship_pixels()).and_then(|ship| {
        ctx.create_texture("asteroids", 96, 96, &asteroid_atlas(32))
            .map(|atlas| (ship, atlas))
    });
    let (ship_texture, atlas) = match textures {
        Ok(textures) => textures,
        Err(err) => {
            log::error!("{err}");
            ctx.exit();
            return;
        }
    };

    let frame = |row: i32, col: i32| {
        Sprite::from_region(atlas, RectInt::from_origin_size(col * 32, row * 32, 32, 32))
    };
    let kinds = [0.75, 1.0, 1.5]
        .into_iter()
        .enumerate()
        .map(|(row, size)| AsteroidKind {
            size,
            frames: [0, 1, 2].map(|col| frame(row as i32, col)),
        })
        .collect();

    let body = ctx
        .physics()
        .add_box(Pose2d::IDENTITY, 1.0, 1.0, 1.0, BodyType2d::Dynamic);
    ctx.resources.insert_resource(Ship {
        body,
        sprite: Sprite::new(ship_texture),
    });

    let root = ctx.ui.root();
    let bar = ctx.ui.table(root);
    ctx.ui.set_fill(bar, BVec2::TRUE);
    ctx.ui.set_margins(bar, Margins::all(12.0));
    let clear_button = ctx.ui.button(bar);
    ctx.ui.set_size(clear_button, Vec2::new(32.0, 32.0));
    ctx.ui.set_color(clear_button, Color::rgb(0.8, 0.2, 0.2).with_alpha(0.7));

    ctx.resources.insert_resource(Field {
        kinds,
        asteroids: Vec::new(),
        last_spawn_secs: 0.0,
        rng: StdRng::from_entropy(),
        clear_button: Some(clear_button),
    });
}

fn steer_ship(ctx: &mut Context) {
    if ctx.input.just_pressed(KeyCode::Escape) {
        ctx.exit();
    }
    let Some(body) = ctx.resources.get_resource::<Ship>().map(|s| s.body) else {
        return;
    };

    let dt = ctx.time.delta_secs();
    let left = ctx.input.pressed(KeyCode::ArrowLeft);
    let right = ctx.input.pressed(KeyCode::ArrowRight);
    let forward = ctx.input.pressed(KeyCode::ArrowUp);
    let back = ctx.input.pressed(KeyCode::ArrowDown);

    let physics = ctx.physics();
    let Some(pose) = physics.pose(body) else {
        return;
    };

    let mut spin = physics.angular_velocity(body).unwrap_or(0.0);
    spin = move_towards(spin, 0.0, 40.0 * dt);
    if right {
        spin = -SHIP_TURN_RATE;
    }
    if left {
        spin = SHIP_TURN_RATE;
    }
    physics.set_angular_velocity(body, spin);

    let heading = direction_from_degrees(pose.rotation_degrees);
    let mut velocity = physics.linear_velocity(body).unwrap_or(Vec2::ZERO);
    velocity = move_towards_vec2(velocity, Vec2::ZERO, 2.0 * dt);
    if forward {
        velocity = heading * SHIP_SPEED;
    }
    if back {
        velocity = heading * -SHIP_SPEED;
    }
    physics.set_linear_velocity(body, velocity);
}

fn spawn_asteroids(ctx: &mut Context) {
    let now = ctx.time.elapsed_secs();
    let half = ctx.camera.visible_world_size() * 0.5;
    let Some(mut field) = ctx.resources.resource_remove::<Field>() else {
        return;
    };

    if now - field.last_spawn_secs >= SPAWN_INTERVAL_SECS && !field.kinds.is_empty() {
        field.last_spawn_secs = now;

        let kind = field.kinds[field.rng.gen_range(0..field.kinds.len())];
        let sprite = kind.frames[field.rng.gen_range(0..kind.frames.len())];

        // Enter from a random point on the left or right edge.
        let side = if field.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let position = Vec2::new(side * half.x, field.rng.gen_range(-half.y..half.y));
        let direction = Vec2::new(
            field.rng.gen_range(-1.0..1.0),
            field.rng.gen_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec2::X);

        let physics = ctx.physics();
        let body = physics.add_circle(
            Pose2d::new(position, 0.0),
            kind.size * 0.5,
            1.0,
            BodyType2d::Dynamic,
        );
        physics.set_linear_velocity(body, direction * ASTEROID_SPEED);
        physics.set_angular_velocity(body, field.rng.gen_range(-90.0..90.0));

        field.asteroids.push(Asteroid {
            body,
            sprite,
            size: kind.size,
        });
        log::debug!("Spawned asteroid #{} (size {})", field.asteroids.len(), kind.size);
    }

    ctx.resources.insert_resource(field);
}

fn clear_field(ctx: &mut Context) {
    let clicked = ctx
        .resources
        .get_resource::<Field>()
        .and_then(|f| f.clear_button)
        .is_some_and(|button| ctx.ui.clicked(button));
    if !clicked && !ctx.input.just_pressed(KeyCode::KeyR) {
        return;
    }

    let asteroids = std::mem::take(&mut ctx.resource_mut::<Field>().asteroids);
    let physics = ctx.physics();
    for asteroid in &asteroids {
        physics.remove(asteroid.body);
    }
    log::info!("Cleared {} asteroids", asteroids.len());
}

/// Teleport bodies that left the screen to the opposite edge.
fn wrap_around(ctx: &mut Context) {
    let half = ctx.camera.visible_world_size() * 0.5 + Vec2::splat(1.0);
    let center = ctx.camera.position();

    let mut bodies = Vec::new();
    if let Some(ship) = ctx.resources.get_resource::<Ship>() {
        bodies.push(ship.body);
    }
    if let Some(field) = ctx.resources.get_resource::<Field>() {
        bodies.extend(field.asteroids.iter().map(|a| a.body));
    }

    let physics = ctx.physics();
    for body in bodies {
        let Some(pose) = physics.pose(body) else {
            continue;
        };
        let offset = pose.position - center;
        let mut wrapped = offset;
        if offset.x.abs() > half.x {
            wrapped.x = -offset.x.signum() * (half.x - 0.01);
        }
        if offset.y.abs() > half.y {
            wrapped.y = -offset.y.signum() * (half.y - 0.01);
        }
        if wrapped != offset {
            physics.sync_to_world(body, Pose2d::new(center + wrapped, pose.rotation_degrees));
        }
    }
}

fn draw_bodies(ctx: &mut Context, draw: &mut Draw) {
    let t = ctx.alpha();
    let Some(physics) = ctx.resources.get_resource::<PhysicsWorld2d>() else {
        return;
    };

    draw.set_color(Color::WHITE);
    if let Some(field) = ctx.resources.get_resource::<Field>() {
        for asteroid in &field.asteroids {
            if let Some(pose) = physics.interpolated(asteroid.body, t) {
                draw.sprite_with(
                    asteroid.sprite,
                    pose.position,
                    Vec2::splat(asteroid.size),
                    pose.rotation_degrees,
                );
            }
        }
    }

    if let Some(ship) = ctx.resources.get_resource::<Ship>() {
        if let Some(pose) = physics.interpolated(ship.body, t) {
            draw.sprite_with(ship.sprite, pose.position, Vec2::ONE, pose.rotation_degrees);
        }
    }
}
