use crate::pose::Keypoint;

/// 前フレームとのブレンド係数。大きいほど前フレーム寄り（ジッタは減るが遅れる）
pub const SMOOTHING_FACTOR: f32 = 0.7;

/// 平滑化の状態。前フレームの出力列を丸ごと保持する。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SmoothingState {
    /// 前フレームなし
    #[default]
    Cold,
    /// 前フレームの出力
    Warm(Vec<Keypoint>),
}

impl SmoothingState {
    pub fn previous(&self) -> Option<&[Keypoint]> {
        match self {
            Self::Cold => None,
            Self::Warm(prev) => Some(prev),
        }
    }
}

/// EMAベースのキーポイント平滑化フィルタ
///
/// 前フレームと同じ個数のときだけ、インデックス位置ごとに
/// `prev * alpha + curr * (1 - alpha)` でブレンドする（id では対応付けない）。
/// 個数が変わったフレームは平滑化せずそのまま使い、新しい前フレームにする。
pub struct Smoother {
    alpha: f32,
    state: SmoothingState,
}

impl Smoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: SmoothingState::Cold,
        }
    }

    pub fn state(&self) -> &SmoothingState {
        &self.state
    }

    pub fn apply(&mut self, keypoints: Vec<Keypoint>) -> Vec<Keypoint> {
        let result = match self.state.previous() {
            Some(prev) if prev.len() == keypoints.len() => blend(prev, &keypoints, self.alpha),
            // 初回 or 個数不一致: そのまま
            _ => keypoints,
        };

        self.state = SmoothingState::Warm(result.clone());
        result
    }

    /// セッション終了時に呼ぶ。次のフレームは素通しになる。
    pub fn reset(&mut self) {
        self.state = SmoothingState::Cold;
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(SMOOTHING_FACTOR)
    }
}

fn blend(prev: &[Keypoint], curr: &[Keypoint], alpha: f32) -> Vec<Keypoint> {
    prev.iter()
        .zip(curr)
        .map(|(p, c)| {
            // prev * alpha + curr * (1 - alpha) と同値。同一位置なら誤差なく curr を返す
            let x = c.x + (p.x - c.x) * alpha;
            let y = c.y + (p.y - c.y) * alpha;
            c.with_position(x, y)
        })
        .collect()
}
