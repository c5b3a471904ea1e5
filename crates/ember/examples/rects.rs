//! Batching stress test: a grid of spinning rects and sprites.
//!
//! Up/Down (or the two buttons) add or remove 100 rects. Every tenth cell is
//! a checkerboard sprite. Run with `RUST_LOG=debug` to see FPS and draw
//! calls once per second. Escape quits.

use ember::prelude::*;

const COLUMNS: usize = 30;
const STEP: usize = 100;

struct Field {
    count: usize,
    reported: Option<usize>,
}

struct Controls {
    more: NodeId,
    fewer: NodeId,
}

struct Checker(Sprite);

fn main() -> ember::Result<()> {
    Game::new("ember rects")
        .resource(Field {
            count: 600,
            reported: None,
        })
        .setup(setup)
        .update(controls)
        .update(report)
        .draw(draw_field)
        .run()
}

/// RGBA8 checkerboard, top row first.
fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if light { 230 } else { 60 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

fn setup(ctx: &mut Context) {
    let texture = match ctx.create_texture("checker", 16, 16, &checkerboard(16, 4)) {
        Ok(texture) => texture,
        Err(err) => {
            log::error!("{err}");
            ctx.exit();
            return;
        }
    };
    let checker = Sprite::new(texture);

    let root = ctx.ui.root();
    let bar = ctx.ui.table(root);
    ctx.ui.set_fill(bar, BVec2::new(true, false));
    ctx.ui.set_size(bar, Vec2::new(0.0, 60.0));
    ctx.ui.set_position(bar, Vec2::new(0.0, ctx.camera.viewport().y - 30.0));
    ctx.ui.set_margins(bar, Margins::all(10.0));

    let more = ctx.ui.button(bar);
    ctx.ui.set_size(more, Vec2::new(40.0, 40.0));
    ctx.ui.set_color(more, Color::rgb(0.2, 0.7, 0.3));

    let fewer = ctx.ui.button(bar);
    ctx.ui.set_size(fewer, Vec2::new(40.0, 40.0));
    ctx.ui.set_color(fewer, Color::rgb(0.8, 0.25, 0.2));

    let icon = ctx.ui.image(bar, Some(checker));
    ctx.ui.set_size(icon, Vec2::new(40.0, 40.0));

    ctx.resources.insert_resource(Controls { more, fewer });
    ctx.resources.insert_resource(Checker(checker));
}

fn controls(ctx: &mut Context) {
    if ctx.input.just_pressed(KeyCode::Escape) {
        ctx.exit();
    }

    let (more, fewer) = match ctx.resources.get_resource::<Controls>() {
        Some(c) => (
            ctx.ui.clicked(c.more) || ctx.input.just_pressed(KeyCode::ArrowUp),
            ctx.ui.clicked(c.fewer) || ctx.input.just_pressed(KeyCode::ArrowDown),
        ),
        None => return,
    };

    let field = ctx.resource_mut::<Field>();
    if more {
        field.count += STEP;
    }
    if fewer {
        field.count = field.count.saturating_sub(STEP);
    }
}

/// Log the draw-call count whenever the rect count changes.
fn report(ctx: &mut Context) {
    let count = ctx.resource::<Field>().count;
    if ctx.resource::<Field>().reported == Some(count) {
        return;
    }
    let draw_calls = ctx.resource::<RenderStats>().draw_calls;
    if draw_calls == 0 {
        return;
    }
    log::info!("{count} cells, {draw_calls} draw calls last frame");
    ctx.resource_mut::<Field>().reported = Some(count);
}

fn draw_field(ctx: &mut Context, draw: &mut Draw) {
    let count = ctx.resource::<Field>().count;
    let Some(checker) = ctx.resources.get_resource::<Checker>().map(|c| c.0) else {
        return;
    };

    let area = ctx.camera.visible_world_size();
    let spacing = area.x / COLUMNS as f32;
    let origin = Vec2::new(-area.x * 0.5 + spacing * 0.5, area.y * 0.5 - spacing * 1.5);
    let spin = ctx.time.elapsed_secs() * 45.0;

    let cell = |i: usize| {
        let (col, row) = (i % COLUMNS, i / COLUMNS);
        let center = origin + Vec2::new(col as f32, -(row as f32)) * spacing;
        (col, row, center, spin + i as f32 * 7.0)
    };
    let size = Vec2::splat(spacing * 0.6);

    // Rects first, then every sprite: two runs keep the draw calls at
    // one per 512 quads instead of one per switch between kinds.
    for i in (0..count).filter(|i| i % 10 != 0) {
        let (col, row, center, angle) = cell(i);
        draw.set_color(Color::rgb(
            col as f32 / COLUMNS as f32,
            0.4,
            1.0 - (row % 20) as f32 / 20.0,
        ));
        draw.rect_rotated(center, size, angle);
    }
    draw.set_color(Color::WHITE);
    for i in (0..count).step_by(10) {
        let (_, _, center, angle) = cell(i);
        draw.sprite_with(checker, center, size, angle);
    }
}
