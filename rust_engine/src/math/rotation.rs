//! 旋转构造：轴角、两向量、三点线段

use glam::{Quat, Vec3};

/// 旋转轴模长阈值，低于此值视为平行/反平行
pub const AXIS_EPSILON: f32 = 1e-3;

/// 从轴角构造四元数，轴退化或角度非法时返回单位旋转
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO || !angle.is_finite() {
        return Quat::IDENTITY;
    }
    let quat = Quat::from_axis_angle(axis, angle);
    if quat.is_finite() {
        quat
    } else {
        Quat::IDENTITY
    }
}

/// 计算将 `from` 方向旋转到 `to` 方向的四元数
///
/// 零向量、平行或反平行（旋转轴不确定）时返回单位旋转。
pub fn quat_from_two_vectors(from: Vec3, to: Vec3) -> Quat {
    let a = from.normalize_or_zero();
    let b = to.normalize_or_zero();
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let axis = a.cross(b);
    if axis.length() < AXIS_EPSILON {
        return Quat::IDENTITY;
    }

    let angle = a.dot(b).clamp(-1.0, 1.0).acos();
    quat_from_axis_angle(axis, angle)
}

/// 三点 (prev, current, next) 处线段的旋转：prev→current 方向转到 current→next 方向
pub fn segment_rotation(prev: Vec3, current: Vec3, next: Vec3) -> Quat {
    quat_from_two_vectors(current - prev, next - current)
}
