//! Windowless benchmark: walks the city for a fixed number of frames with
//! both frame drivers and reports where the time goes.
//!
//! ```bash
//! cargo run --release --bin headless -- --frames 2000
//! ```

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;

use minicity_rs::{
    config::Config,
    logging,
    renderer::{FrameDriver, Pipeline, SyncRenderer},
    scene::{draw_street, draw_street_sprites},
    world::{Camera, City},
};

/// Straight down the street, in world units per frame.
const WALK_SPEED: f32 = 0.15;

#[derive(Parser, Debug)]
#[command(version, about = "Windowless renderer benchmark")]
struct Args {
    #[arg(long, default_value_t = 600)]
    frames: u32,

    #[arg(long, default_value_t = 12345)]
    seed: u32,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Totals {
    build: Duration,
    raster: Duration,
    wall: Duration,
    triangles: usize,
    dropped: usize,
    sprites: usize,
}

fn run(name: &str, driver: &mut dyn FrameDriver, cfg: &Config, frames: u32) -> anyhow::Result<()> {
    let mut city = City::new(&cfg.city);
    let mut camera = Camera::new(&cfg.camera, cfg.render.width, cfg.render.height);
    let yaw = std::f32::consts::FRAC_PI_2;
    let mut pos = Vec3::new(2.0, 0.0, 0.0);
    let mut totals = Totals::default();

    let start = Instant::now();
    for f in 0..frames {
        pos.x += WALK_SPEED;
        city.update_chunks(pos.x);
        camera.update_third_person(pos, yaw);

        let t0 = Instant::now();
        driver.begin_frame();
        draw_street(&camera, &city, driver.frame().triangles, pos);
        totals.build += t0.elapsed();

        let stats = driver.end_frame()?;
        totals.raster += stats.raster_time;
        totals.triangles += stats.triangles;
        totals.dropped += stats.dropped;

        let time_ms = f * 16;
        let mut frame = driver.frame();
        totals.sprites += draw_street_sprites(&camera, &city, &mut frame.overlay, pos, time_ms);
    }
    totals.wall = start.elapsed();

    let n = frames.max(1) as f64;
    let ms = |d: Duration| d.as_secs_f64() * 1000.0 / n;
    log::info!(
        "{name}: {frames} frames, build {:.3} ms, raster {:.3} ms, {:.1} FPS",
        ms(totals.build),
        ms(totals.raster),
        n / totals.wall.as_secs_f64().max(f64::EPSILON)
    );
    log::info!(
        "{name}: {:.0} triangles/frame, {} dropped, {:.1} sprites/frame, chunks {:?}",
        totals.triangles as f64 / n,
        totals.dropped,
        totals.sprites as f64 / n,
        city.window()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = Config::default();
    cfg.city.seed = args.seed;
    cfg.validate()?;

    run("sync", &mut SyncRenderer::new(&cfg.render), &cfg, args.frames)?;
    run("pipelined", &mut Pipeline::spawn(&cfg.render)?, &cfg, args.frames)?;
    Ok(())
}
