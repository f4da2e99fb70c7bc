use super::keypoint::{Keypoint, KeypointIndex};

/// 骨格の事前知識で物理的にありえないキーポイントを落とすフィルタ
///
/// 現在のルール: 腰が検出されているフレームで、膝が腰より上
/// (画像座標で y が小さい) にあれば膝を捨てる。
/// 参照する腰は左優先、無ければ右。
#[derive(Debug, Clone, Copy, Default)]
pub struct AnatomicalFilter;

impl AnatomicalFilter {
    /// フレームのキーポイント列をフィルタする。入力順は保持される。
    ///
    /// 腰 (11, 12) は膝 (13, 14) より id が小さいので、
    /// id 昇順で見たときと同じく腰を先に記録してから膝を判定する。
    pub fn apply(keypoints: Vec<Keypoint>) -> Vec<Keypoint> {
        // id で引く y 座標テーブル（腰のみ記録）
        let mut hip_y: [Option<f32>; KeypointIndex::COUNT] = [None; KeypointIndex::COUNT];
        for kp in keypoints.iter().filter(|kp| kp.id.is_hip()) {
            hip_y[kp.id.index()] = Some(kp.y);
        }

        let reference = hip_y[KeypointIndex::LeftHip.index()].or(hip_y[KeypointIndex::RightHip.index()]);
        keypoints
            .into_iter()
            .filter(|kp| Self::accept(kp, reference))
            .collect()
    }

    fn accept(kp: &Keypoint, hip_y: Option<f32>) -> bool {
        match hip_y {
            // 膝は腰より下になければならない
            Some(hip_y) if kp.id.is_knee() => kp.y >= hip_y,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(id: KeypointIndex, y: f32) -> Keypoint {
        Keypoint::new(id, 100.0, y, 0.9)
    }

    fn ids(keypoints: &[Keypoint]) -> Vec<KeypointIndex> {
        keypoints.iter().map(|k| k.id).collect()
    }

    #[test]
    fn test_knee_above_hip_dropped() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::LeftHip, 500.0),
            kp(KeypointIndex::LeftKnee, 480.0),
        ]);
        assert_eq!(ids(&out), vec![KeypointIndex::LeftHip]);
    }

    #[test]
    fn test_knee_below_hip_kept() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::LeftHip, 500.0),
            kp(KeypointIndex::LeftKnee, 520.0),
        ]);
        assert_eq!(ids(&out), vec![KeypointIndex::LeftHip, KeypointIndex::LeftKnee]);
    }

    #[test]
    fn test_knee_level_with_hip_kept() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::RightHip, 300.0),
            kp(KeypointIndex::RightKnee, 300.0),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_no_hip_keeps_knees() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::LeftShoulder, 600.0),
            kp(KeypointIndex::LeftKnee, 10.0),
            kp(KeypointIndex::RightKnee, 20.0),
        ]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_left_hip_takes_precedence() {
        // 右腰基準なら膝は落ちるが、左腰基準なので残る
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::LeftHip, 400.0),
            kp(KeypointIndex::RightHip, 600.0),
            kp(KeypointIndex::LeftKnee, 500.0),
            kp(KeypointIndex::RightKnee, 350.0),
        ]);
        assert_eq!(
            ids(&out),
            vec![KeypointIndex::LeftHip, KeypointIndex::RightHip, KeypointIndex::LeftKnee]
        );
    }

    #[test]
    fn test_right_hip_used_when_left_missing() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::RightHip, 500.0),
            kp(KeypointIndex::LeftKnee, 480.0),
            kp(KeypointIndex::RightKnee, 520.0),
        ]);
        assert_eq!(ids(&out), vec![KeypointIndex::RightHip, KeypointIndex::RightKnee]);
    }

    #[test]
    fn test_only_knees_are_filtered() {
        let out = AnatomicalFilter::apply(vec![
            kp(KeypointIndex::Nose, 900.0),
            kp(KeypointIndex::LeftHip, 500.0),
            kp(KeypointIndex::LeftAnkle, 100.0),
        ]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_hip_from_previous_frame_not_used() {
        AnatomicalFilter::apply(vec![kp(KeypointIndex::LeftHip, 500.0)]);

        let out = AnatomicalFilter::apply(vec![kp(KeypointIndex::LeftKnee, 100.0)]);
        assert_eq!(ids(&out), vec![KeypointIndex::LeftKnee]);
    }

    #[test]
    fn test_empty_input() {
        assert!(AnatomicalFilter::apply(Vec::new()).is_empty());
    }
}
