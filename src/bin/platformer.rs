//! Auto-scrolling view of the streamed side-scrolling level.
//!
//! ```bash
//! cargo run --release --bin platformer -- --speed 2
//! ```
//!
//! Left/Right change the scroll speed, Escape quits. Gems are collected as
//! the left third of the screen passes them.

use std::time::{Duration, Instant};

use clap::Parser;
use minifb::{Key, Scale, Window, WindowOptions};

use minicity_rs::{
    config::Config,
    logging,
    renderer::{ColorBuffer, DepthBuffer, Overlay},
    world::{Level, sky_color},
};

const REPORT_EVERY: Duration = Duration::from_secs(3);
const MAX_SPEED: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(version, about = "Streamed side-scrolling level")]
struct Args {
    #[arg(long, default_value_t = 34125)]
    seed: u32,

    /// Initial scroll speed in pixels per frame.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,

    /// Window magnification (1, 2 or 4).
    #[arg(long, default_value_t = 2)]
    scale: usize,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = Config::default();
    cfg.level.seed = args.seed;
    cfg.validate()?;

    let h = cfg.level.rows * cfg.level.tile_size;
    let w = h;
    let mut color = ColorBuffer::new(w, h);
    let mut depth = DepthBuffer::new(w, h);
    let mut level = Level::new(&cfg.level);

    let mut win = Window::new(
        "minicity platformer",
        w,
        h,
        WindowOptions {
            scale: match args.scale {
                0 | 1 => Scale::X1,
                2 | 3 => Scale::X2,
                _ => Scale::X4,
            },
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    let start = Instant::now();
    let mut camera_x = 0.0f32;
    let mut speed = args.speed.clamp(0.0, MAX_SPEED);
    let mut score = 0u32;
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0u32;
    let mut last_report = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let time_ms = start.elapsed().as_millis() as u32;

        if win.is_key_down(Key::Right) {
            speed = (speed + 0.1).min(MAX_SPEED);
        }
        if win.is_key_down(Key::Left) {
            speed = (speed - 0.1).max(0.0);
        }
        camera_x += speed;
        level.update_chunks(camera_x);

        // sweep a column a third of the way in
        let probe_x = camera_x as i32 + w as i32 / 3;
        for row in 0..cfg.level.rows as i32 {
            let y = row * cfg.level.tile_size as i32;
            score += level.collect_gems(probe_x, y, cfg.level.tile_size as i32);
        }

        for y in 0..h {
            let px = sky_color(y).to_rgba();
            color.row_mut(y).fill(px);
        }
        depth.clear();
        level.draw(&mut Overlay::new(&mut color, &mut depth), camera_x as i32, time_ms);

        win.update_with_buffer(color.pixels(), w, h)?;

        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_report.elapsed() >= REPORT_EVERY {
            let avg = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!(
                "avg frame: {avg:.2} ms, chunks {:?}, score {score}",
                level.window()
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_report = Instant::now();
        }
    }
    Ok(())
}
