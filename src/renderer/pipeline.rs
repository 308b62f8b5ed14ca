//! Two-thread front end.
//!
//! The builder thread fills one [`Stage`] while a dedicated renderer thread
//! rasterizes the other. `end_frame` is the single sync point where the two
//! stages trade places:
//!
//! ```text
//!   builder                         renderer
//!   ───────                         ────────
//!   fill list N          ┐          rasterize list N-1 into buffer R
//!   end_frame:           │
//!     recv RenderDone  ◄─┼───────── send RenderDone(stage R)
//!     swap stages        │
//!     send RenderJob   ──┼────────► recv RenderJob(list N)
//!   overlay on R, show R ┘          rasterize list N …
//! ```
//!
//! Exactly one job is in flight at any time, so both channels are
//! `bounded(1)` and neither side ever queues more than one message.

use std::{
    io, mem,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, bounded};
use thiserror::Error;

use super::{ColorBuffer, Frame, FrameDriver, FrameStats, Overlay, Stage, render_to_buffer};
use crate::config::RenderConfig;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not start the renderer thread: {0}")]
    Spawn(#[from] io::Error),

    /// The renderer thread is gone (it panicked or was shut down).
    #[error("renderer thread disconnected")]
    Disconnected,
}

/// Work for the renderer: rasterize the first `count` triangles of
/// `stage.triangles` into `stage.color` / `stage.depth`.
struct RenderJob {
    count: usize,
    stage: Stage,
}

/// The stage comes back with a finished image.
struct RenderDone {
    elapsed: Duration,
    stage: Stage,
}

pub struct Pipeline {
    /// Builder side: the list being filled plus the image on display.
    held: Stage,
    jobs: Option<Sender<RenderJob>>,
    done: Receiver<RenderDone>,
    worker: Option<JoinHandle<()>>,
    frames: u64,
}

impl Pipeline {
    /// Start the renderer thread and prime it with an empty job, so the
    /// first `end_frame` has a finished (background-only) image to collect.
    pub fn spawn(cfg: &RenderConfig) -> Result<Self, PipelineError> {
        let (job_tx, job_rx) = bounded::<RenderJob>(1);
        let (done_tx, done_rx) = bounded::<RenderDone>(1);

        let worker = thread::Builder::new()
            .name("renderer".into())
            .spawn(move || render_loop(job_rx, done_tx))?;

        let held = Stage::new(cfg.width, cfg.height, cfg.max_triangles);
        let primer = Stage::new(cfg.width, cfg.height, cfg.max_triangles);
        job_tx
            .send(RenderJob {
                count: 0,
                stage: primer,
            })
            .map_err(|_| PipelineError::Disconnected)?;

        log::debug!(
            "renderer thread started ({}×{}, {} triangles per list)",
            cfg.width,
            cfg.height,
            cfg.max_triangles
        );

        Ok(Self {
            held,
            jobs: Some(job_tx),
            done: done_rx,
            worker: Some(worker),
            frames: 0,
        })
    }

    /// Frames handed to the renderer so far (the primer excluded).
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn render_loop(jobs: Receiver<RenderJob>, done: Sender<RenderDone>) {
    // `recv` fails once the builder drops its sender: that is shutdown.
    while let Ok(RenderJob { count, mut stage }) = jobs.recv() {
        let start = Instant::now();
        let Stage {
            triangles,
            color,
            depth,
        } = &mut stage;
        render_to_buffer(triangles.first(count), color, depth);
        let elapsed = start.elapsed();

        if done.send(RenderDone { elapsed, stage }).is_err() {
            break;
        }
    }
    log::debug!("renderer thread exiting");
}

impl FrameDriver for Pipeline {
    fn begin_frame(&mut self) {
        self.held.triangles.clear();
    }

    fn frame(&mut self) -> Frame<'_> {
        let Stage {
            triangles,
            color,
            depth,
        } = &mut self.held;
        Frame {
            triangles,
            overlay: Overlay::new(color, depth),
        }
    }

    fn end_frame(&mut self) -> Result<FrameStats, PipelineError> {
        let jobs = self.jobs.as_ref().ok_or(PipelineError::Disconnected)?;

        // 1. wait for the renderer to finish the previous list
        let RenderDone {
            elapsed,
            stage: mut finished,
        } = self.done.recv().map_err(|_| PipelineError::Disconnected)?;

        // 2.–4. the finished buffers go on display and the filled list goes
        // out; the count is taken before the exchange
        let count = self.held.triangles.len();
        let dropped = self.held.triangles.dropped();
        if dropped > 0 {
            log::debug!("triangle list full, {dropped} triangles dropped");
        }
        mem::swap(&mut self.held, &mut finished);
        self.held.triangles.clear();

        // 5. hand the filled list over
        jobs.send(RenderJob {
            count,
            stage: finished,
        })
        .map_err(|_| PipelineError::Disconnected)?;

        self.frames += 1;
        log::trace!(
            "frame {}: sent {count} triangles, last pass took {elapsed:?}",
            self.frames
        );
        Ok(FrameStats {
            triangles: count,
            dropped,
            raster_time: elapsed,
        })
    }

    fn display(&self) -> &ColorBuffer {
        &self.held.color
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        // closing the job channel ends `render_loop`
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("renderer thread panicked");
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
