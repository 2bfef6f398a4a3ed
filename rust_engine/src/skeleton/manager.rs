//! 骨骼管理器

use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;

use super::Bone;

/// 骨骼管理器
///
/// 骨骼由宿主按名称注册，重定向引擎只通过名称查找并修改旋转。
pub struct BoneManager {
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
    sorted_indices: Vec<usize>,
}

impl BoneManager {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            name_to_index: HashMap::new(),
            sorted_indices: Vec::new(),
        }
    }

    /// 添加骨骼，返回索引
    pub fn add_bone(&mut self, bone: Bone) -> usize {
        let index = self.bones.len();
        self.name_to_index.insert(bone.name.clone(), index);
        self.bones.push(bone);
        index
    }

    /// 构建骨骼层级
    ///
    /// 按层级深度排序（父骨骼先于子骨骼），并计算相对父骨骼的偏移。
    pub fn build_hierarchy(&mut self) {
        let bone_count = self.bones.len();
        if bone_count == 0 {
            return;
        }

        let depths: Vec<usize> = (0..bone_count).map(|i| self.depth_of(i)).collect();
        self.sorted_indices = (0..bone_count).collect();
        self.sorted_indices.sort_by_key(|&i| depths[i]);

        for i in 0..bone_count {
            let pos = self.bones[i].initial_position;
            let offset = match self.parent_of(i) {
                Some(parent) => pos - self.bones[parent].initial_position,
                None => pos,
            };
            self.bones[i].bone_offset = offset;
            self.bones[i].global_transform = Mat4::from_translation(pos);
            self.bones[i].local_transform = Mat4::from_translation(offset);
        }
    }

    // 父链长度，遇到环时截断
    fn depth_of(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(parent) = self.parent_of(current) {
            depth += 1;
            current = parent;
            if depth >= self.bones.len() {
                log::warn!("骨骼 {} 的父链存在环", self.bones[index].name);
                break;
            }
        }
        depth
    }

    fn parent_of(&self, index: usize) -> Option<usize> {
        let parent = self.bones.get(index)?.parent_index;
        if parent >= 0 && (parent as usize) < self.bones.len() && parent as usize != index {
            Some(parent as usize)
        } else {
            None
        }
    }

    /// 通过名称查找骨骼
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 获取骨骼数量
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 获取骨骼
    pub fn get_bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// 获取可变骨骼引用
    pub fn get_bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    /// 通过名称获取可变骨骼引用
    pub fn get_bone_by_name_mut(&mut self, name: &str) -> Option<&mut Bone> {
        let index = self.find_bone_by_name(name)?;
        self.bones.get_mut(index)
    }

    /// 当前本地旋转
    pub fn bone_rotation(&self, name: &str) -> Option<Quat> {
        self.find_bone_by_name(name)
            .and_then(|i| self.bones.get(i))
            .map(|b| b.rotation)
    }

    /// 重置所有骨骼到静止姿势
    pub fn reset_all_rotations(&mut self) {
        for bone in &mut self.bones {
            bone.reset_rotation();
        }
    }

    /// 更新本地与全局变换（父骨骼先于子骨骼）
    pub fn update_transforms(&mut self) {
        if self.sorted_indices.len() != self.bones.len() {
            self.build_hierarchy();
        }

        for i in 0..self.sorted_indices.len() {
            let idx = self.sorted_indices[i];
            self.bones[idx].update_local_transform();
            let global = match self.parent_of(idx) {
                Some(parent) => self.bones[parent].global_transform * self.bones[idx].local_transform,
                None => self.bones[idx].local_transform,
            };
            self.bones[idx].global_transform = global;
        }
    }

    /// 获取全局变换
    pub fn get_global_transform(&self, index: usize) -> Mat4 {
        self.bones.get(index).map(|b| b.global_transform).unwrap_or(Mat4::IDENTITY)
    }

    /// 获取全局位置
    pub fn get_global_position(&self, index: usize) -> Vec3 {
        self.bones.get(index).map(Bone::global_position).unwrap_or(Vec3::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter()
    }
}

impl Default for BoneManager {
    fn default() -> Self {
        Self::new()
    }
}
