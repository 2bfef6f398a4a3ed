//! 最新帧缓冲槽
//!
//! 检测器在自己的线程上投递结果，渲染帧开始时取走最新一帧。

use std::sync::{Arc, Mutex, MutexGuard};

use super::HolisticFrame;

/// 线程安全的单槽缓冲，新帧覆盖未取走的旧帧
#[derive(Clone, Debug, Default)]
pub struct LatestFrameSlot {
    inner: Arc<Mutex<Option<HolisticFrame>>>,
}

impl LatestFrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 投递新帧（检测器线程调用）
    pub fn publish(&self, frame: HolisticFrame) {
        *self.lock() = Some(frame);
    }

    /// 取走最新帧（渲染线程调用）
    pub fn take(&self) -> Option<HolisticFrame> {
        self.lock().take()
    }

    pub fn has_pending(&self) -> bool {
        self.lock().is_some()
    }

    // 投递方崩溃不应拖垮渲染循环，忽略锁中毒
    fn lock(&self) -> MutexGuard<'_, Option<HolisticFrame>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
