use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

use crate::pipeline::OverlaySink;
use crate::pose::{Keypoint, Surface};
use crate::render::skeleton::{EdgeIndexing, OverlayFrame, KEYPOINT_COLOR, SKELETON_COLOR};

/// minifbを使用したオーバーレイレンダラー
///
/// 最後に受け取った骨格を保持し、新しいフレームが来るまで毎回描き直す。
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    point_radius: i32,
    line_width: i32,
    overlay: Vec<Keypoint>,
    indexing: EdgeIndexing,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize, point_radius: u32, line_width: u32) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
            point_radius: point_radius as i32,
            line_width: line_width.max(1) as i32,
            overlay: Vec::new(),
            indexing: EdgeIndexing::default(),
        })
    }

    /// 描画サーフェスのサイズ
    pub fn surface(&self) -> Surface {
        Surface::new(self.width as f32, self.height as f32)
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// BGR Mat をバッファにコピー
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// 保持している骨格を描画
    pub fn draw_overlay(&mut self) {
        let overlay = std::mem::take(&mut self.overlay);
        let frame = OverlayFrame::new(&overlay, self.indexing);

        for (x, y) in frame.points() {
            self.draw_circle(x as i32, y as i32, self.point_radius, KEYPOINT_COLOR);
        }
        for ((x1, y1), (x2, y2)) in frame.segments() {
            self.draw_line(x1 as i32, y1 as i32, x2 as i32, y2 as i32, SKELETON_COLOR);
        }

        self.overlay = overlay;
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenhamのアルゴリズムで線を描画（line_width の太さ）
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = self.line_width / 2;

        let mut x = x0;
        let mut y = y0;

        loop {
            if half == 0 {
                self.set_pixel(x, y, color);
            } else {
                self.draw_circle(x, y, half, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

impl OverlaySink for MinifbRenderer {
    fn present(&mut self, frame: OverlayFrame<'_>) {
        self.overlay.clear();
        self.overlay.extend_from_slice(frame.keypoints);
        self.indexing = frame.indexing;
    }
}
