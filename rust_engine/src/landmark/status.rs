//! 检测状态统计

use serde::Serialize;

use super::{HolisticFrame, LandmarkSet};

/// 关键点集合的平均可见度（百分比，四舍五入）
///
/// 未提供可见度的点按 1.0 计，缺失的点不参与统计；集合为空返回 None。
pub fn visibility_score(landmarks: &LandmarkSet) -> Option<u8> {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for landmark in landmarks.iter().flatten() {
        sum += landmark.visibility.unwrap_or(1.0).clamp(0.0, 1.0);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some((sum / count as f32 * 100.0).round() as u8)
}

/// 各身体部位的检测状态（None 表示本帧未检测到）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DetectionStatus {
    pub face: Option<u8>,
    pub body: Option<u8>,
    pub left_hand: Option<u8>,
    pub right_hand: Option<u8>,
}

impl DetectionStatus {
    pub fn from_frame(frame: &HolisticFrame) -> Self {
        let score = |set: &Option<LandmarkSet>| set.as_ref().and_then(visibility_score);
        Self {
            face: score(&frame.face_landmarks),
            body: score(&frame.pose_landmarks),
            left_hand: score(&frame.left_hand_landmarks),
            right_hand: score(&frame.right_hand_landmarks),
        }
    }

    /// 面部与至少一只手同时可用
    pub fn is_tracking_ready(&self) -> bool {
        self.face.is_some() && (self.left_hand.is_some() || self.right_hand.is_some())
    }
}
