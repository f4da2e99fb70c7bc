use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::render::EdgeIndexing;

/// アプリ設定 (config.toml)
///
/// 信頼度閾値・平滑化係数などパイプラインの定数はここには含めない。
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラ番号
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 30 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// ヒートマップを出力する PoseNet の ONNX モデル
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String { "models/posenet_mobilenet.onnx".to_string() }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_window_title")]
    pub title: String,
    /// 骨格線の引き方 ("id" | "position")
    #[serde(default)]
    pub edge_indexing: EdgeIndexing,
    #[serde(default = "default_point_radius")]
    pub point_radius: u32,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

fn default_window_title() -> String { "Pose Overlay".to_string() }
fn default_point_radius() -> u32 { 10 }
fn default_line_width() -> u32 { 5 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            edge_indexing: EdgeIndexing::default(),
            point_radius: default_point_radius(),
            line_width: default_line_width(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// RUST_LOG 未設定時のフィルタ
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定を使う
    ///
    /// ログ初期化前に呼ばれるので、読み込みエラーは呼び出し側で出力する。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}
