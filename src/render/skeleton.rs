use serde::Deserialize;

use crate::pose::{Keypoint, KeypointIndex, Pose};

/// 骨格の接続定義 (開始キーポイント, 終了キーポイント)
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 16] = [
    // 顔
    (KeypointIndex::Nose, KeypointIndex::LeftEye),
    (KeypointIndex::Nose, KeypointIndex::RightEye),
    (KeypointIndex::LeftEye, KeypointIndex::LeftEar),
    (KeypointIndex::RightEye, KeypointIndex::RightEar),
    // 上半身
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // 胴体
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // 下半身
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

/// キーポイントの色 (RGB)
pub const KEYPOINT_COLOR: u32 = 0x0000FF; // 青

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0x00FF00; // 緑

/// 接続定義の id をどう解決するか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeIndexing {
    /// 関節 id で引く。両端の関節が検出されているときだけ線を引く。
    #[default]
    Id,
    /// フレーム列の位置で引く（旧挙動）。
    /// 低い id が落ちると以降の位置がずれ、別の関節同士が結ばれることがある。
    Position,
}

/// 描画する線分 ((x1, y1), (x2, y2))
pub type Segment = ((f32, f32), (f32, f32));

/// レンダラーに渡す1フレーム分の描画データ
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub keypoints: &'a [Keypoint],
    pub indexing: EdgeIndexing,
}

impl<'a> OverlayFrame<'a> {
    pub fn new(keypoints: &'a [Keypoint], indexing: EdgeIndexing) -> Self {
        Self { keypoints, indexing }
    }

    /// 描画する点 (x, y)
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + 'a {
        let keypoints = self.keypoints;
        keypoints.iter().map(Keypoint::position)
    }

    /// 描画する線分
    pub fn segments(&self) -> Vec<Segment> {
        match self.indexing {
            EdgeIndexing::Id => segments_by_id(self.keypoints),
            EdgeIndexing::Position => segments_by_position(self.keypoints),
        }
    }
}

/// 両端の関節 id がフレームに揃っている接続だけを線分にする
pub fn segments_by_id(keypoints: &[Keypoint]) -> Vec<Segment> {
    let pose = Pose::from_keypoints(keypoints);
    SKELETON_CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| {
            let start = pose.get(a)?;
            let end = pose.get(b)?;
            Some((start.position(), end.position()))
        })
        .collect()
}

/// 接続定義の id をフレーム列の位置として扱う
pub fn segments_by_position(keypoints: &[Keypoint]) -> Vec<Segment> {
    SKELETON_CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| {
            let start = keypoints.get(a.index())?;
            let end = keypoints.get(b.index())?;
            Some((start.position(), end.position()))
        })
        .collect()
}
