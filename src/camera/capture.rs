use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

use super::latest::{LatestFrame, Sequenced};

/// OpenCVを使用したカメラキャプチャ
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    /// 解像度とFPSを指定してカメラを開く
    pub fn open_with_config(index: i32, width: Option<u32>, height: Option<u32>, fps: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        if let Some(f) = fps {
            capture.set(videoio::CAP_PROP_FPS, f as f64)?;
        }
        // ドライバ側でもフレームを溜めない
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let actual_fps = capture.get(videoio::CAP_PROP_FPS)?;
        info!("Camera {}: {}x{} @ {} fps", index, actual_width, actual_height, actual_fps);

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
        })
    }

    /// 解像度を取得
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// 別スレッドでカメラキャプチャを行い、最新フレームだけを提供する
///
/// 処理が追いつかない間に届いたフレームは捨てられる。
/// drop でキャプチャスレッドを止める。
pub struct ThreadedCamera {
    latest: Arc<LatestFrame<Mat>>,
    running: Arc<AtomicBool>,
    width: u32,
    height: u32,
    handle: Option<thread::JoinHandle<()>>,
}

impl ThreadedCamera {
    pub fn start(index: i32, width: Option<u32>, height: Option<u32>, fps: Option<u32>) -> Result<Self> {
        let mut camera = OpenCvCamera::open_with_config(index, width, height, fps)?;
        let (w, h) = camera.resolution();
        let latest = Arc::new(LatestFrame::new());
        let latest_ref = latest.clone();
        let running = Arc::new(AtomicBool::new(true));
        let running_ref = running.clone();

        let handle = thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || {
                while running_ref.load(Ordering::Acquire) {
                    match camera.read_frame() {
                        Ok(frame) => {
                            latest_ref.publish(frame);
                        }
                        Err(e) => warn!("Frame capture error: {:#}", e),
                    }
                }
            })
            .context("Failed to spawn capture thread")?;

        Ok(Self {
            latest,
            running,
            width: w,
            height: h,
            handle: Some(handle),
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 前回以降に届いた最新フレームを取得。新しいフレームが無ければ None。
    pub fn next_frame(&self) -> Option<Sequenced<Mat>> {
        self.latest.take()
    }

    /// 処理されずに捨てられたフレーム数
    pub fn dropped_frames(&self) -> u64 {
        self.latest.dropped()
    }

    /// 起動からキャプチャしたフレーム総数
    pub fn captured_frames(&self) -> u64 {
        self.latest.published()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Camera capture thread panicked");
            }
        }
    }
}

impl Drop for ThreadedCamera {
    fn drop(&mut self) {
        self.stop();
    }
}
