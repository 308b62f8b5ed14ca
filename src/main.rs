//! Third-person walk through the procedurally streamed city.
//!
//! ```bash
//! cargo run --release -- --seed 7 --scale 4
//! ```
//!
//! Arrow keys steer, Escape quits. `--sync` renders on the main thread
//! instead of the two-thread pipeline.

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use minifb::{Key, Scale, Window, WindowOptions};

use minicity_rs::{
    config::Config,
    logging,
    renderer::{FrameDriver, Pipeline, Rgb, SyncRenderer},
    scene::{draw_street, draw_street_sprites},
    world::{Camera, City},
};

const TURN_SPEED: f32 = 0.05;
const ACCEL: f32 = 0.04;
const FRICTION: f32 = 0.85;
/// Half-width of the walkable street.
const STREET_HALF_WIDTH: f32 = 2.5;
const PLAYER_RADIUS: f32 = 0.5;
const PICKUP_RADIUS: f32 = 1.5;
const REPORT_EVERY: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(version, about = "Fixed-point 3D city walk")]
struct Args {
    /// World seed.
    #[arg(long, default_value_t = 12345)]
    seed: u32,

    /// Window magnification (1, 2, 4 or 8).
    #[arg(long, default_value_t = 4)]
    scale: usize,

    /// Rasterize on the main thread.
    #[arg(long)]
    sync: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// Tank-steered follow target.
struct Walker {
    pos: Vec3,
    vel: Vec3,
    yaw: f32,
}

impl Walker {
    fn new() -> Self {
        Self {
            pos: Vec3::new(2.0, 0.0, 0.0),
            vel: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_2,
        }
    }

    fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    fn step(&mut self, win: &Window, city: &City) {
        if win.is_key_down(Key::Left) {
            self.yaw -= TURN_SPEED;
        }
        if win.is_key_down(Key::Right) {
            self.yaw += TURN_SPEED;
        }
        if win.is_key_down(Key::Up) {
            self.vel += self.forward() * ACCEL;
        }
        if win.is_key_down(Key::Down) {
            self.vel -= self.forward() * ACCEL * 0.5;
        }
        self.vel *= FRICTION;

        let mut next = self.pos + self.vel;
        next.z = next.z.clamp(-STREET_HALF_WIDTH, STREET_HALF_WIDTH);
        if city.check_collision(next.x, next.z, PLAYER_RADIUS) {
            self.vel = Vec3::ZERO;
        } else {
            self.pos = next;
        }
    }
}

fn window_scale(n: usize) -> Scale {
    match n {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        _ => Scale::X8,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = Config::default();
    cfg.city.seed = args.seed;
    cfg.validate()?;
    let (w, h) = (cfg.render.width, cfg.render.height);

    let mut driver: Box<dyn FrameDriver> = if args.sync {
        Box::new(SyncRenderer::new(&cfg.render))
    } else {
        Box::new(Pipeline::spawn(&cfg.render)?)
    };

    let mut city = City::new(&cfg.city);
    let mut camera = Camera::new(&cfg.camera, w, h);
    let mut walker = Walker::new();
    let mut score = 0u32;

    let mut win = Window::new(
        "minicity",
        w,
        h,
        WindowOptions {
            scale: window_scale(args.scale),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    log::info!(
        "seed {}, {} renderer",
        args.seed,
        if args.sync { "sync" } else { "pipelined" }
    );

    let start = Instant::now();
    let mut acc_frame = Duration::ZERO;
    let mut acc_raster = Duration::ZERO;
    let mut acc_frames = 0u32;
    let mut last_report = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let time_ms = start.elapsed().as_millis() as u32;

        walker.step(&win, &city);
        city.update_chunks(walker.pos.x);
        let gained = city.collect_gems(walker.pos.x, walker.pos.z, PICKUP_RADIUS);
        if gained > 0 {
            score += gained;
            log::debug!("score {score}");
        }
        camera.update_third_person(walker.pos, walker.yaw);

        driver.begin_frame();
        draw_street(&camera, &city, driver.frame().triangles, walker.pos);
        let stats = driver.end_frame()?;

        {
            let mut frame = driver.frame();
            draw_street_sprites(&camera, &city, &mut frame.overlay, walker.pos, time_ms);
            // score bar along the top edge, one pixel per 10 points
            let bar = (score / 10).min(w as u32) as i32;
            frame.overlay.fill_rect(0, 0, bar, 2, Rgb::new(255, 220, 100));
        }
        win.update_with_buffer(driver.display().pixels(), w, h)?;

        acc_frame += t0.elapsed();
        acc_raster += stats.raster_time;
        acc_frames += 1;
        if last_report.elapsed() >= REPORT_EVERY {
            let avg = acc_frame.as_secs_f64() * 1000.0 / acc_frames as f64;
            let raster = acc_raster.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!(
                "avg frame: {avg:.2} ms ({:.1} FPS), raster {raster:.2} ms, {} triangles",
                1000.0 / avg,
                stats.triangles
            );
            acc_frame = Duration::ZERO;
            acc_raster = Duration::ZERO;
            acc_frames = 0;
            last_report = Instant::now();
        }
    }

    log::info!("final score {score}");
    Ok(())
}
