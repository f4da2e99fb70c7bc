/// COCO 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    /// 全インデックス（id昇順）
    pub const ALL: [KeypointIndex; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_hip(self) -> bool {
        matches!(self, Self::LeftHip | Self::RightHip)
    }

    pub fn is_knee(self) -> bool {
        matches!(self, Self::LeftKnee | Self::RightKnee)
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// 関節ID
    pub id: KeypointIndex,
    /// オーバーレイ座標系のX (px)
    pub x: f32,
    /// オーバーレイ座標系のY (px, 下向きが正)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(id: KeypointIndex, x: f32, y: f32, confidence: f32) -> Self {
        Self { id, x, y, confidence }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// 位置だけ差し替えたコピー
    pub fn with_position(self, x: f32, y: f32) -> Self {
        Self { x, y, ..self }
    }
}

/// id で引ける 17 スロットの疎な姿勢。欠けた関節は None。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub keypoints: [Option<Keypoint>; KeypointIndex::COUNT],
}

impl Pose {
    /// フレームのキーポイント列から構築（同じidが複数あれば後勝ち）
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        let mut slots = [None; KeypointIndex::COUNT];
        for kp in keypoints {
            slots[kp.id.index()] = Some(*kp);
        }
        Self { keypoints: slots }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.keypoints[index.index()].as_ref()
    }
}
