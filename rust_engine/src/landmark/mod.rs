//! 检测器关键点数据
//!
//! 检测器每帧输出零个或多个关键点集合（面部 ≤478、身体 33、左右手各 21）。
//! 坐标处于检测器空间，转换到场景空间时 y、z 取反。

mod slot;
mod status;

pub use slot::LatestFrameSlot;
pub use status::{visibility_score, DetectionStatus};

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 面部关键点最大数量（含虹膜）
pub const FACE_LANDMARK_COUNT: usize = 478;
/// 身体关键点数量
pub const POSE_LANDMARK_COUNT: usize = 33;
/// 单手关键点数量
pub const HAND_LANDMARK_COUNT: usize = 21;

/// 单个关键点
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.visibility.map_or(true, f32::is_finite)
    }

    /// 检测器空间 → 右手系场景空间（y、z 取反）
    pub fn to_scene_vector(&self) -> Vec3 {
        Vec3::new(self.x, -self.y, -self.z)
    }
}

/// 关键点集合
///
/// 每个位置可能缺失；反序列化时格式错误的条目（非数值坐标等）记为缺失。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Option<Landmark>>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self::from_optional(points.into_iter().map(Some).collect())
    }

    pub fn from_optional(points: Vec<Option<Landmark>>) -> Self {
        let points = points
            .into_iter()
            .map(|p| p.filter(Landmark::is_finite))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 获取关键点，越界或缺失返回 None
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).and_then(Option::as_ref)
    }

    /// 场景空间坐标
    pub fn scene_point(&self, index: usize) -> Option<Vec3> {
        self.get(index).map(Landmark::to_scene_vector)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Landmark>> {
        self.points.iter().map(Option::as_ref)
    }

    /// 标记某个关键点缺失
    pub fn remove(&mut self, index: usize) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = None;
        }
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let points = raw
            .into_iter()
            .map(|value| serde_json::from_value::<Landmark>(value).ok())
            .collect();
        Ok(Self::from_optional(points))
    }
}

/// 检测器单帧输出
///
/// 字段名与检测器 JSON 输出保持一致。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticFrame {
    #[serde(default)]
    pub face_landmarks: Option<LandmarkSet>,
    #[serde(default)]
    pub pose_landmarks: Option<LandmarkSet>,
    /// 身体 3D 世界坐标（姿态解算器的深度参考）
    #[serde(default, rename = "za")]
    pub pose_world_landmarks: Option<LandmarkSet>,
    #[serde(default)]
    pub left_hand_landmarks: Option<LandmarkSet>,
    #[serde(default)]
    pub right_hand_landmarks: Option<LandmarkSet>,
}

impl HolisticFrame {
    pub fn is_empty(&self) -> bool {
        self.face_landmarks.is_none()
            && self.pose_landmarks.is_none()
            && self.pose_world_landmarks.is_none()
            && self.left_hand_landmarks.is_none()
            && self.right_hand_landmarks.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_vector() {
        let v = Landmark::new(0.1, 0.2, 0.3).to_scene_vector();
        assert_eq!(v, Vec3::new(0.1, -0.2, -0.3));
    }

    #[test]
    fn test_non_finite_point_is_absent() {
        let set = LandmarkSet::new(vec![
            Landmark::new(0.0, 0.0, 0.0),
            Landmark::new(f32::NAN, 0.0, 0.0),
        ]);
        assert_eq!(set.len(), 2);
        assert!(set.get(0).is_some());
        assert!(set.get(1).is_none());
        assert!(set.get(5).is_none());
    }

    #[test]
    fn test_lenient_deserialize() {
        let json = r#"[
            {"x": 0.5, "y": 0.25, "z": -0.1, "visibility": 0.9},
            {"x": "abc", "y": 0.0, "z": 0.0},
            null,
            {"x": 1.0, "y": 1.0, "z": 1.0}
        ]"#;
        let set: LandmarkSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(0).unwrap().visibility, Some(0.9));
        assert!(set.get(1).is_none());
        assert!(set.get(2).is_none());
        assert!(set.get(3).is_some());
    }

    #[test]
    fn test_frame_field_names() {
        let json = r#"{
            "faceLandmarks": null,
            "za": [{"x": 0.0, "y": 0.0, "z": 0.0}],
            "rightHandLandmarks": [{"x": 0.0, "y": 0.0, "z": 0.0}]
        }"#;
        let frame: HolisticFrame = serde_json::from_str(json).unwrap();
        assert!(frame.face_landmarks.is_none());
        assert!(frame.pose_landmarks.is_none());
        assert_eq!(frame.pose_world_landmarks.as_ref().map(LandmarkSet::len), Some(1));
        assert!(frame.left_hand_landmarks.is_none());
        assert!(frame.right_hand_landmarks.is_some());
        assert!(!frame.is_empty());
    }
}
