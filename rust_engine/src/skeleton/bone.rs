//! 骨骼节点

use glam::{Mat4, Quat, Vec3};

/// 骨骼节点
///
/// `rotation` 是骨骼当前的本地朝向，由旋转混合器逐帧向目标插值，不会被直接覆盖。
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent_index: i32,

    // 初始位置（世界空间）
    pub initial_position: Vec3,
    // 相对于父骨骼的偏移（在build_hierarchy中计算）
    pub bone_offset: Vec3,

    // 当前本地旋转
    pub rotation: Quat,

    // 变换结果
    pub local_transform: Mat4,
    pub global_transform: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_index: -1,
            initial_position: Vec3::ZERO,
            bone_offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            local_transform: Mat4::IDENTITY,
            global_transform: Mat4::IDENTITY,
        }
    }

    /// 指定父骨骼与初始位置
    pub fn with_parent(name: impl Into<String>, parent_index: i32, position: Vec3) -> Self {
        let mut bone = Self::new(name);
        bone.parent_index = parent_index;
        bone.initial_position = position;
        bone
    }

    /// 重置为静止姿势
    pub fn reset_rotation(&mut self) {
        self.rotation = Quat::IDENTITY;
    }

    /// 向目标旋转做球面插值
    pub fn slerp_toward(&mut self, target: Quat, factor: f32) {
        let next = self.rotation.slerp(target, factor.clamp(0.0, 1.0));
        if next.is_finite() {
            self.rotation = next.normalize();
        }
    }

    /// 更新本地变换：平移 = bone_offset，旋转 = rotation
    pub fn update_local_transform(&mut self) {
        self.local_transform = Mat4::from_rotation_translation(self.rotation, self.bone_offset);
    }

    /// 全局位置
    pub fn global_position(&self) -> Vec3 {
        self.global_transform.col(3).truncate()
    }
}

impl Default for Bone {
    fn default() -> Self {
        Self::new(String::new())
    }
}
