//! Headless driver for the infinite canvas.
//!
//! Loads a media manifest, resolves the device configuration, replays a
//! scripted input session against a simulated texture backend and prints a
//! JSON summary of the final state.
mod backend;
mod script;

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use canvas::config::{Appearance, CanvasConfig, ConfigOverrides, DeviceProfile};
use canvas::controller::Cursor;
use canvas::error::CanvasError;
use canvas::stats::CanvasStats;
use canvas::InfiniteCanvas;
use clap::Parser;
use foundation::math::Vec3;
use runtime::frame::Frame;
use scene::media::MediaList;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::backend::SimulatedBackend;
use crate::script::{Modality, Script};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless infinite media canvas")]
struct Args {
    /// JSON manifest: [{"url": .., "width": .., "height": ..}, ..]
    #[arg(long)]
    media: PathBuf,

    /// Frames to simulate (default: CANVAS_FRAMES or 600)
    #[arg(long)]
    frames: Option<u64>,

    /// Treat the device as touch-only (no hover drift, pinch/drag input)
    #[arg(long)]
    touch: bool,

    /// Use the mobile GPU budget (shorter render distance, smaller cache)
    #[arg(long)]
    mobile: bool,

    /// Device pixel ratio (default: CANVAS_DPR or 1.0)
    #[arg(long)]
    dpr: Option<f64>,

    /// JSON file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames before a simulated load completes (default: CANVAS_LATENCY_FRAMES or 3)
    #[arg(long)]
    latency_frames: Option<u32>,

    /// Fail every n-th texture load
    #[arg(long)]
    fail_every: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Summary {
    frames: u64,
    camera: Vec3,
    cursor: Cursor,
    pixel_ratio: f64,
    active_chunks: usize,
    visible_planes: usize,
    progress: u8,
    ready: bool,
    fault: Option<String>,
    stats: CanvasStats,
    appearance: Appearance,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let media = load_media(&args.media)?;
    let device = DeviceProfile {
        touch: args.touch,
        mobile: args.mobile,
        device_pixel_ratio: args.dpr.unwrap_or_else(|| env_var_f64("CANVAS_DPR", 1.0)),
    };
    let mut config = CanvasConfig::resolve(device);
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        let overrides = ConfigOverrides::from_json(&text).map_err(|e| e.to_string())?;
        config = config.with_overrides(&overrides).map_err(|e| e.to_string())?;
    }

    let frames = args
        .frames
        .unwrap_or_else(|| env_var_u64("CANVAS_FRAMES", 600));
    let latency = args
        .latency_frames
        .unwrap_or_else(|| env_var_u32("CANVAS_LATENCY_FRAMES", 3));

    let sizes: BTreeMap<String, (u32, u32)> = media
        .items()
        .iter()
        .map(|m| (m.url.clone(), (m.width.max(0.0) as u32, m.height.max(0.0) as u32)))
        .collect();
    let backend = SimulatedBackend::new(sizes, latency, args.fail_every);
    let pixel_ratio = config.pixel_ratio;

    let mut canvas = InfiniteCanvas::new(config, media, backend);
    canvas.on_progress(|pct| info!("loading {pct}%"));

    match canvas.mount() {
        Ok(()) => {}
        Err(CanvasError::EmptyMedia) => {
            println!("media manifest is empty; nothing to show");
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    }

    let modality = if args.touch {
        Modality::Touch
    } else {
        Modality::Pointer
    };
    let script = Script::new(modality);

    let mut ran = 0;
    let mut was_ready = false;
    for i in 0..frames {
        for event in script.events_for(i) {
            canvas.handle_event(&event);
        }
        if let Err(e) = canvas.frame(Frame::fixed(i, FRAME_MS)) {
            warn!("frame {i} failed: {e}");
            break;
        }
        ran += 1;
        if !was_ready && canvas.is_ready() {
            was_ready = true;
            info!("canvas ready after {i} frames");
        }
    }

    let camera = canvas.camera().map(|c| c.position).unwrap_or_default();
    let summary = Summary {
        frames: ran,
        camera,
        cursor: canvas.cursor(),
        pixel_ratio,
        active_chunks: canvas.active_chunk_count(),
        visible_planes: canvas.draws().len(),
        progress: canvas.progress(),
        ready: canvas.is_ready(),
        fault: canvas.fault().map(str::to_string),
        stats: canvas.stats(),
        appearance: canvas.appearance().clone(),
    };

    canvas.unmount().map_err(|e| e.to_string())?;
    info!(
        "backend after unmount: {} resident, {} disposed, {} cancelled",
        canvas.backend_mut().resident(),
        canvas.backend_mut().disposed(),
        canvas.backend_mut().cancelled()
    );

    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn load_media(path: &Path) -> Result<MediaList, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read manifest {}: {e}", path.display()))?;
    parse_media(&text).map_err(|e| format!("invalid manifest {}: {e}", path.display()))
}

fn parse_media(text: &str) -> Result<MediaList, String> {
    let media: MediaList = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if let Some(bad) = media.items().iter().find(|m| m.url.trim().is_empty()) {
        return Err(format!("media item with empty url ({}x{})", bad.width, bad.height));
    }
    Ok(media)
}

fn env_var_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::parse_media;

    #[test]
    fn manifest_parses_in_order() {
        let media = parse_media(
            r#"[{"url":"a.jpg","width":800,"height":600},{"url":"b.jpg","width":1,"height":2}]"#,
        )
        .expect("parse");
        assert_eq!(media.len(), 2);
        assert_eq!(media.items()[1].url, "b.jpg");
    }

    #[test]
    fn empty_manifest_is_valid() {
        assert!(parse_media("[]").expect("parse").is_empty());
    }

    #[test]
    fn rejects_blank_urls_and_garbage() {
        assert!(parse_media(r#"[{"url":" ","width":1,"height":1}]"#).is_err());
        assert!(parse_media(r#"{"url":"a"}"#).is_err());
    }
}
