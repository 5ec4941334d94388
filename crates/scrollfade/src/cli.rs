use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use galleryconfig::{AntialiasSetting, ColorSpaceSetting};
use renderer::{Antialiasing, ColorSpaceMode};
use transition::WrapMode;

use crate::bindings;

#[derive(Parser, Debug)]
#[command(
    name = "scrollfade",
    author,
    version,
    about = "Scroll-driven image gallery with shader cross-fades"
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Image files or directories to show, in order. Replaces the configured gallery.
    #[arg(value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// Gallery configuration file (defaults to `gallery.toml` in the config directory).
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Start in borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Output color space handling: `auto`, `gamma`, or `linear`.
    #[arg(long, value_name = "MODE", value_parser = parse_color_space)]
    pub color_space: Option<ColorSpaceMode>,

    /// GLSL fragment shader replacing the built-in cross-fade.
    #[arg(long, value_name = "FILE")]
    pub shader: Option<PathBuf>,

    /// Speed added per pixel of scroll.
    #[arg(long, value_name = "FACTOR", value_parser = parse_finite)]
    pub sensitivity: Option<f64>,

    /// Wrap behaviour once the position runs past either end: `inherited` or `modular`.
    #[arg(long, value_name = "MODE", value_parser = parse_wrap)]
    pub wrap: Option<WrapMode>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the transition engine headless and print per-frame state.
    Simulate(SimulateArgs),
    /// Print the resolved configuration, image list and transition tuning.
    Inspect,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of slides in the simulated gallery.
    #[arg(long, value_name = "N", default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub slides: u32,

    /// Scroll delta in browser pixels, optionally applied before a given frame (`DELTA[@FRAME]`).
    #[arg(long = "scroll", value_name = "DELTA[@FRAME]", allow_hyphen_values = true, value_parser = parse_scroll_event)]
    pub scrolls: Vec<ScrollEvent>,

    /// Number of frames to advance.
    #[arg(long, value_name = "COUNT", default_value_t = 60)]
    pub frames: u32,

    /// Emit one JSON object per frame instead of aligned text.
    #[arg(long)]
    pub json: bool,

    /// Stop early once the position has settled on a slide.
    #[arg(long)]
    pub until_rest: bool,

    /// Speed added per pixel of scroll (overrides the configuration).
    #[arg(long, value_name = "FACTOR", value_parser = parse_finite)]
    pub sensitivity: Option<f64>,

    /// Wrap behaviour (overrides the configuration).
    #[arg(long, value_name = "MODE", value_parser = parse_wrap)]
    pub wrap: Option<WrapMode>,
}

/// A scroll delta injected before frame `frame` is advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub delta_y: f64,
    pub frame: u32,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    if value.trim().is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }
    value
        .parse::<AntialiasSetting>()
        .map(bindings::map_antialias)
        .map_err(|err| format!("{err}; use auto/off or 2/4/8/16"))
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceMode, String> {
    if value.trim().is_empty() {
        return Err("color space must not be empty".to_string());
    }
    value
        .parse::<ColorSpaceSetting>()
        .map(bindings::map_color_space)
        .map_err(|err| format!("{err} (expected auto, gamma, or linear)"))
}

pub fn parse_wrap(value: &str) -> Result<WrapMode, String> {
    value.parse()
}

pub fn parse_finite(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid number '{value}': {err}"))?;
    if !parsed.is_finite() {
        return Err(format!("'{value}' is not a finite number"));
    }
    Ok(parsed)
}

pub fn parse_scroll_event(value: &str) -> Result<ScrollEvent, String> {
    let (delta, frame) = match value.trim().split_once('@') {
        Some((delta, frame)) => {
            let frame = frame
                .trim()
                .parse::<u32>()
                .map_err(|err| format!("invalid frame '{frame}' in '{value}': {err}"))?;
            (delta, frame)
        }
        None => (value, 0),
    };
    Ok(ScrollEvent {
        delta_y: parse_finite(delta)?,
        frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antialias_accepts_keywords_and_counts() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("OFF").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("8").unwrap(), Antialiasing::Samples(8));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("").is_err());
    }

    #[test]
    fn color_space_parses() {
        assert_eq!(parse_color_space("linear").unwrap(), ColorSpaceMode::Linear);
        assert_eq!(parse_color_space("sRGB").unwrap(), ColorSpaceMode::Gamma);
        assert!(parse_color_space("hdr").is_err());
    }

    #[test]
    fn scroll_events_default_to_first_frame() {
        assert_eq!(
            parse_scroll_event("1000").unwrap(),
            ScrollEvent {
                delta_y: 1000.0,
                frame: 0
            }
        );
        assert_eq!(
            parse_scroll_event("-250.5@12").unwrap(),
            ScrollEvent {
                delta_y: -250.5,
                frame: 12
            }
        );
        assert!(parse_scroll_event("fast").is_err());
        assert!(parse_scroll_event("10@soon").is_err());
        assert!(parse_scroll_event("inf").is_err());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "scrollfade",
            "a.jpg",
            "photos",
            "--size",
            "800x600",
            "--wrap",
            "modular",
            "--sensitivity",
            "0.001",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(
            cli.run.images,
            vec![PathBuf::from("a.jpg"), PathBuf::from("photos")]
        );
        assert_eq!(cli.run.size.as_deref(), Some("800x600"));
        assert_eq!(cli.run.wrap, Some(WrapMode::Modular));
        assert_eq!(cli.run.sensitivity, Some(0.001));
    }

    #[test]
    fn simulate_collects_repeated_scrolls() {
        let cli = Cli::try_parse_from([
            "scrollfade",
            "simulate",
            "--slides",
            "3",
            "--scroll",
            "1000",
            "--scroll",
            "-400@7",
            "--frames",
            "20",
            "--json",
        ])
        .unwrap();
        let Some(Command::Simulate(args)) = cli.command else {
            panic!("expected simulate subcommand");
        };
        assert_eq!(args.slides, 3);
        assert_eq!(args.frames, 20);
        assert!(args.json);
        assert_eq!(args.scrolls.len(), 2);
        assert_eq!(args.scrolls[1].frame, 7);
        assert_eq!(args.scrolls[1].delta_y, -400.0);
    }

    #[test]
    fn simulate_rejects_zero_slides() {
        assert!(Cli::try_parse_from(["scrollfade", "simulate", "--slides", "0"]).is_err());
    }
}
