//! Headless run of the transition engine for tuning and debugging.
//!
//! A `GallerySession` over slide indices is ticked once per simulated frame;
//! a recording sink stands in for the GPU so each line reports exactly what
//! the shader would have received.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use transition::{GallerySession, GalleryStore, TransitionParams, UniformSink};

use crate::cli::{ScrollEvent, SimulateArgs};

#[derive(Debug, Default)]
struct RecordingSink {
    progress: f32,
    pair: (usize, usize),
}

impl UniformSink<usize> for RecordingSink {
    fn set_progress(&mut self, progress: f32) {
        self.progress = progress;
    }

    fn set_textures(&mut self, first: &usize, second: &usize) {
        self.pair = (*first, *second);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u32,
    pub position: f64,
    pub speed: f64,
    pub current: usize,
    pub next: usize,
    pub progress: f32,
}

/// Runs the simulation, writing one report per frame to `out`. Returns the
/// last report, if any frame was advanced.
pub fn run<W: Write>(
    args: &SimulateArgs,
    params: TransitionParams,
    out: &mut W,
) -> Result<Option<FrameReport>> {
    let slides: Vec<usize> = (0..args.slides as usize).collect();
    let gallery = GalleryStore::new(slides).context("simulation needs at least one slide")?;
    let mut session = GallerySession::new(gallery, params);
    let mut sink = RecordingSink::default();

    let mut scrolls: Vec<ScrollEvent> = args.scrolls.clone();
    scrolls.sort_by_key(|event| event.frame);
    if let Some(late) = scrolls.iter().find(|event| event.frame >= args.frames) {
        tracing::warn!(
            frame = late.frame,
            frames = args.frames,
            "scroll scheduled after the last simulated frame is ignored"
        );
    }
    let last_scroll = scrolls.last().map_or(0, |event| event.frame);

    tracing::debug!(
        slides = args.slides,
        frames = args.frames,
        scrolls = scrolls.len(),
        wrap = %params.wrap,
        "starting simulation"
    );

    let mut pending = scrolls.iter().peekable();
    let mut last = None;
    for frame in 0..args.frames {
        while let Some(event) = pending.next_if(|event| event.frame == frame) {
            session.on_scroll_y(event.delta_y);
        }

        session.tick(&mut sink);
        let state = session.state();
        let report = FrameReport {
            frame,
            position: state.position(),
            speed: state.speed(),
            current: sink.pair.0,
            next: sink.pair.1,
            progress: sink.progress,
        };
        write_report(out, &report, args.json)?;
        last = Some(report);

        if args.until_rest && frame >= last_scroll && state.is_at_rest() {
            tracing::debug!(frame, "position settled");
            break;
        }
    }

    out.flush().context("failed to flush simulation output")?;
    Ok(last)
}

fn write_report<W: Write>(out: &mut W, report: &FrameReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report).context("failed to encode frame report")?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{:>5}  position={:+.6}  speed={:+.6}  current={}  next={}  progress={:.6}",
            report.frame,
            report.position,
            report.speed,
            report.current,
            report.next,
            report.progress
        )?;
    }
    Ok(())
}
