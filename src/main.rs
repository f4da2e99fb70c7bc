use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pose_overlay::camera::ThreadedCamera;
use pose_overlay::config::Config;
use pose_overlay::pose::{preprocess_for_posenet, HeatmapDetector};
use pose_overlay::render::MinifbRenderer;
use pose_overlay::{FrameOutcome, PosePipeline};

const CONFIG_PATH: &str = "config.toml";

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let (config, load_error) = Config::load_or_default(CONFIG_PATH);
    init_logging(&config.log.level);
    if let Some(e) = load_error {
        warn!("{:#}, using default config", e);
    }

    info!("Pose Overlay {}", env!("GIT_VERSION"));
    info!("Press ESC to exit");

    let mut camera = ThreadedCamera::start(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
        Some(config.camera.fps),
    )?;
    let (width, height) = camera.resolution();
    info!("Camera resolution: {}x{}", width, height);

    info!("Loading model from {}...", config.model.path);
    let mut detector = HeatmapDetector::new(&config.model.path)?;
    info!("Model loaded");

    let mut renderer = MinifbRenderer::new(
        &config.render.title,
        width as usize,
        height as usize,
        config.render.point_radius,
        config.render.line_width,
    )?;
    let mut pipeline = PosePipeline::new(config.render.edge_indexing);
    info!("Edge indexing: {:?}", pipeline.indexing());

    let mut frame_count = 0u32;
    let mut empty_count = 0u32;
    let mut fps_timer = Instant::now();

    while renderer.is_open() {
        let Some(frame) = camera.next_frame() else {
            renderer.update()?;
            std::thread::sleep(Duration::from_millis(1));
            continue;
        };

        // 推論失敗はキーポイントなしとして扱う
        let heatmap = match preprocess_for_posenet(&frame.frame).and_then(|input| detector.detect(input)) {
            Ok(heatmap) => Some(heatmap),
            Err(e) => {
                warn!("Frame {} skipped: {:#}", frame.seq, e);
                None
            }
        };

        renderer.draw_frame(&frame.frame)?;
        let surface = renderer.surface();
        let outcome = pipeline.process(heatmap.as_ref().map(|h| h.view()), surface, &mut renderer);
        if outcome == FrameOutcome::Empty {
            empty_count += 1;
        }
        renderer.draw_overlay();
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            info!(
                "FPS: {:.1}, empty: {}, captured: {}, dropped: {}",
                frame_count as f32 / elapsed,
                empty_count,
                camera.captured_frames(),
                camera.dropped_frames()
            );
            frame_count = 0;
            empty_count = 0;
            fps_timer = Instant::now();
        }
    }

    info!("Shutting down...");
    pipeline.reset();
    camera.stop();
    Ok(())
}
