//! 向量与旋转基础运算

mod rotation;

pub use rotation::{quat_from_axis_angle, quat_from_two_vectors, segment_rotation, AXIS_EPSILON};

use std::ops::Neg;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// 关节旋转（XYZ 顺序欧拉角，弧度）
///
/// 所有构造路径都保证分量有限，非法输入回退为单位旋转。
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl JointRotation {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        if x.is_finite() && y.is_finite() && z.is_finite() {
            Self { x, y, z }
        } else {
            Self::IDENTITY
        }
    }

    /// 从四元数转换（XYZ 顺序）
    pub fn from_quat(quat: Quat) -> Self {
        if !quat.is_finite() {
            return Self::IDENTITY;
        }
        let (x, y, z) = quat.normalize().to_euler(EulerRot::XYZ);
        Self::new(x, y, z)
    }

    /// 转换为四元数（XYZ 顺序）
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// 逐轴缩放
    pub fn scaled(self, scale: Vec3) -> Self {
        Self::new(self.x * scale.x, self.y * scale.y, self.z * scale.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// 相对单位旋转的角度（弧度）
    pub fn angle(self) -> f32 {
        Quat::IDENTITY.angle_between(self.to_quat())
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

/// 镜像：三个轴全部取反
impl Neg for JointRotation {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<Quat> for JointRotation {
    fn from(quat: Quat) -> Self {
        Self::from_quat(quat)
    }
}
