//! ヒートマップのデコード
//!
//! キーポイントごとに最大セルを探し、セル中心をサーフェス座標へ拡大し、
//! 信頼度で足切りする。

use ndarray::{ArrayView2, ArrayView4, Axis};
use tracing::debug;

use super::keypoint::{Keypoint, KeypointIndex};

/// この値未満のピークは未検出として捨てる
pub const CONFIDENCE_THRESHOLD: f32 = 0.4;

/// ヒートマップのキーポイントチャンネル数
pub const NUM_KEYPOINTS: usize = KeypointIndex::COUNT;

/// 描画先サーフェスのサイズ (px)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// レイアウト済みか。幅・高さのどちらかが0以下ならまだ描画できない。
    pub fn is_laid_out(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 2次元グリッドの最大セルを探す (row, col, score)
///
/// 行優先で走査し、同値は最初に見つかったセルを採用する。
/// NaN は選ばれない。
pub fn argmax(grid: ArrayView2<f32>) -> Option<(usize, usize, f32)> {
    let mut best: Option<(usize, usize, f32)> = None;
    let mut best_score = f32::NEG_INFINITY;

    for ((row, col), &score) in grid.indexed_iter() {
        if score > best_score {
            best_score = score;
            best = Some((row, col, score));
        }
    }

    best
}

/// `[batch, rows, cols, keypoints]` のヒートマップからキーポイントを抽出する
///
/// - batch 0 のみ使用
/// - ピークが [`CONFIDENCE_THRESHOLD`] 未満の関節は出力しない
/// - 座標はセル中心 `(col + 0.5, row + 0.5)` をサーフェスサイズへ拡大
/// - 出力は id 昇順
///
/// サーフェス未レイアウト・テンソル退化時は空を返す。
pub fn decode_heatmap(heatmap: ArrayView4<f32>, surface: Surface) -> Vec<Keypoint> {
    if !surface.is_laid_out() {
        debug!(
            "surface {}x{} not laid out, skipping decode",
            surface.width, surface.height
        );
        return Vec::new();
    }

    let (batch, rows, cols, channels) = heatmap.dim();
    if batch == 0 || rows == 0 || cols == 0 {
        debug!("degenerate heatmap shape {:?}", heatmap.shape());
        return Vec::new();
    }

    let x_scale = surface.width / cols as f32;
    let y_scale = surface.height / rows as f32;

    let frame = heatmap.index_axis(Axis(0), 0);
    let mut keypoints = Vec::with_capacity(NUM_KEYPOINTS);

    for id in (0..channels).filter_map(KeypointIndex::from_index) {
        let channel = frame.index_axis(Axis(2), id.index());
        let Some((row, col, score)) = argmax(channel) else {
            continue;
        };

        if score < CONFIDENCE_THRESHOLD {
            continue;
        }

        let x = (col as f32 + 0.5) * x_scale;
        let y = (row as f32 + 0.5) * y_scale;
        keypoints.push(Keypoint::new(id, x, y, score.clamp(0.0, 1.0)));
    }

    keypoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, Array4};

    const H: usize = 9;
    const W: usize = 17;

    fn empty_heatmap() -> Array4<f32> {
        Array4::<f32>::zeros((1, H, W, NUM_KEYPOINTS))
    }

    #[test]
    fn test_surface_laid_out() {
        assert!(Surface::new(1080.0, 1920.0).is_laid_out());
        assert!(!Surface::new(0.0, 1920.0).is_laid_out());
        assert!(!Surface::new(1080.0, 0.0).is_laid_out());
        assert!(!Surface::new(-1.0, 10.0).is_laid_out());
        assert!(!Surface::new(f32::NAN, 10.0).is_laid_out());
    }

    #[test]
    fn test_argmax_first_max_wins() {
        let mut grid = Array2::<f32>::zeros((3, 3));
        grid[[0, 2]] = 0.8;
        grid[[1, 0]] = 0.8;
        grid[[2, 2]] = 0.8;
        assert_eq!(argmax(grid.view()), Some((0, 2, 0.8)));
    }

    #[test]
    fn test_argmax_ignores_nan() {
        let mut grid = Array2::<f32>::from_elem((2, 2), f32::NAN);
        assert_eq!(argmax(grid.view()), None);

        grid[[1, 1]] = 0.3;
        assert_eq!(argmax(grid.view()), Some((1, 1, 0.3)));
    }

    #[test]
    fn test_argmax_empty_grid() {
        let grid = Array2::<f32>::zeros((0, 4));
        assert_eq!(argmax(grid.view()), None);
    }

    #[test]
    fn test_coordinate_mapping() {
        let mut heatmap = empty_heatmap();
        heatmap[[0, 4, 8, 0]] = 0.9;

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(1080.0, 1920.0));
        assert_eq!(keypoints.len(), 1);

        let nose = keypoints[0];
        assert_eq!(nose.id, KeypointIndex::Nose);
        assert_relative_eq!(nose.x, 8.5 * (1080.0 / 17.0), epsilon = 1e-3);
        assert_relative_eq!(nose.x, 540.0, epsilon = 1e-3);
        assert_relative_eq!(nose.y, 960.0, epsilon = 1e-3);
        assert_relative_eq!(nose.confidence, 0.9);
    }

    #[test]
    fn test_threshold_drops_weak_keypoints() {
        let mut heatmap = empty_heatmap();
        heatmap[[0, 1, 1, 0]] = 0.39;
        heatmap[[0, 2, 2, 1]] = 0.4;
        heatmap[[0, 3, 3, 2]] = 0.95;

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(100.0, 100.0));
        let ids: Vec<_> = keypoints.iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![KeypointIndex::LeftEye, KeypointIndex::RightEye]);
    }

    #[test]
    fn test_output_ascending_and_unique() {
        let mut heatmap = empty_heatmap();
        for k in (0..NUM_KEYPOINTS).rev() {
            heatmap[[0, k % H, (k * 3) % W, k]] = 0.5 + k as f32 * 0.01;
        }

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(640.0, 480.0));
        assert_eq!(keypoints.len(), NUM_KEYPOINTS);
        for pair in keypoints.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_tie_break_is_row_major() {
        let mut heatmap = empty_heatmap();
        heatmap[[0, 2, 10, 5]] = 0.7;
        heatmap[[0, 2, 3, 5]] = 0.7;
        heatmap[[0, 6, 0, 5]] = 0.7;

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(W as f32, H as f32));
        assert_eq!(keypoints.len(), 1);
        assert_relative_eq!(keypoints[0].x, 3.5);
        assert_relative_eq!(keypoints[0].y, 2.5);
    }

    #[test]
    fn test_confidence_clamped() {
        let mut heatmap = empty_heatmap();
        heatmap[[0, 0, 0, 3]] = 7.5;

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(10.0, 10.0));
        assert_eq!(keypoints[0].id, KeypointIndex::LeftEar);
        assert_eq!(keypoints[0].confidence, 1.0);
    }

    #[test]
    fn test_surface_not_laid_out_skips() {
        let mut heatmap = empty_heatmap();
        heatmap[[0, 4, 8, 0]] = 0.9;
        assert!(decode_heatmap(heatmap.view(), Surface::new(0.0, 0.0)).is_empty());
        assert!(decode_heatmap(heatmap.view(), Surface::new(1080.0, 0.0)).is_empty());
    }

    #[test]
    fn test_degenerate_tensor() {
        let surface = Surface::new(100.0, 100.0);
        let no_rows = Array4::<f32>::zeros((1, 0, W, NUM_KEYPOINTS));
        let no_cols = Array4::<f32>::zeros((1, H, 0, NUM_KEYPOINTS));
        let no_batch = Array4::<f32>::zeros((0, H, W, NUM_KEYPOINTS));
        assert!(decode_heatmap(no_rows.view(), surface).is_empty());
        assert!(decode_heatmap(no_cols.view(), surface).is_empty());
        assert!(decode_heatmap(no_batch.view(), surface).is_empty());
    }

    #[test]
    fn test_fewer_channels_than_keypoints() {
        let mut heatmap = Array4::<f32>::zeros((1, H, W, 3));
        heatmap[[0, 0, 0, 2]] = 0.8;

        let keypoints = decode_heatmap(heatmap.view(), Surface::new(10.0, 10.0));
        assert_eq!(keypoints.len(), 1);
        assert_eq!(keypoints[0].id, KeypointIndex::RightEye);
    }

    #[test]
    fn test_extra_channels_ignored() {
        let mut heatmap = Array4::<f32>::zeros((1, H, W, NUM_KEYPOINTS + 2));
        heatmap[[0, 0, 0, NUM_KEYPOINTS]] = 0.9;
        heatmap[[0, 0, 0, NUM_KEYPOINTS + 1]] = 0.9;

        assert!(decode_heatmap(heatmap.view(), Surface::new(10.0, 10.0)).is_empty());
    }
}
