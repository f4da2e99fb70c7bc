//! フレーム単位の処理: デコード → 骨格フィルタ → 平滑化 → 描画
//!
//! 平滑化状態はセッション中パイプラインが持つ。
//! `process` は `&mut self` なので同時に処理できるのは1フレームだけ。
//! 推論を別スレッドで回す場合は、結果をパイプラインを持つスレッドへ戻すこと。

use ndarray::ArrayView4;
use tracing::debug;

use crate::pose::{decode_heatmap, AnatomicalFilter, Keypoint, Surface};
use crate::render::{EdgeIndexing, OverlayFrame};
use crate::tracker::{Smoother, SmoothingState};

/// 描画先。パイプラインは描画内容を渡すだけ。
pub trait OverlaySink {
    fn present(&mut self, frame: OverlayFrame<'_>);
}

/// 1フレーム処理の結果
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// サーフェス未レイアウト
    Skipped,
    /// 有効なキーポイントなし（ヒートマップなしを含む）。描画も状態更新もしない
    Empty,
    /// 平滑化済みキーポイントを描画した
    Rendered(Vec<Keypoint>),
}

pub struct PosePipeline {
    smoother: Smoother,
    indexing: EdgeIndexing,
}

impl PosePipeline {
    pub fn new(indexing: EdgeIndexing) -> Self {
        Self {
            smoother: Smoother::default(),
            indexing,
        }
    }

    pub fn indexing(&self) -> EdgeIndexing {
        self.indexing
    }

    pub fn smoothing_state(&self) -> &SmoothingState {
        self.smoother.state()
    }

    /// 1フレーム分を処理して sink に渡す
    ///
    /// `heatmap` が None（推論失敗など）のときはキーポイントなしとして扱う。
    pub fn process<S: OverlaySink + ?Sized>(
        &mut self,
        heatmap: Option<ArrayView4<f32>>,
        surface: Surface,
        sink: &mut S,
    ) -> FrameOutcome {
        let Some(heatmap) = heatmap else {
            debug!("no heatmap for this frame");
            return FrameOutcome::Empty;
        };
        if !surface.is_laid_out() {
            return FrameOutcome::Skipped;
        }

        let decoded = decode_heatmap(heatmap, surface);
        let keypoints = AnatomicalFilter::apply(decoded);

        debug!("Detected keypoints: {}", keypoints.len());
        for (i, kp) in keypoints.iter().enumerate() {
            debug!("Keypoint {} ({:?}): ({:.1}, {:.1}) conf={:.2}", i, kp.id, kp.x, kp.y, kp.confidence);
        }

        // 空フレームは前フレームの骨格を画面に残す
        if keypoints.is_empty() {
            return FrameOutcome::Empty;
        }

        let smoothed = self.smoother.apply(keypoints);
        sink.present(OverlayFrame::new(&smoothed, self.indexing));
        FrameOutcome::Rendered(smoothed)
    }

    /// セッション終了（カメラ停止など）で平滑化状態を破棄する
    pub fn reset(&mut self) {
        self.smoother.reset();
    }
}

impl Default for PosePipeline {
    fn default() -> Self {
        Self::new(EdgeIndexing::default())
    }
}
