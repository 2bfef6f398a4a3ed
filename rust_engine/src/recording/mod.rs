//! 录制的检测结果回放
//!
//! 录制文件为 JSON，可以是帧数组，也可以是 `{ "fps": n, "frames": [...] }`。
//! 每帧除检测器原始输出外，还可携带预先解算好的 `face` / `pose`，
//! 这样没有解算器实现时也能回放。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::landmark::HolisticFrame;
use crate::model::AvatarRuntime;
use crate::solver::{FaceSolution, PoseRotationSet};
use crate::{MocapError, Result};

/// 未指定帧率时的默认值
pub const DEFAULT_FPS: f32 = 30.0;

/// 录制的一帧
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(flatten)]
    pub results: HolisticFrame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceSolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<PoseRotationSet>,
}

impl RecordedFrame {
    /// 投递到运行时：有预解算结果时直接使用，否则交给运行时的解算器
    pub fn deliver(&self, runtime: &mut AvatarRuntime) {
        if self.face.is_none() && self.pose.is_none() {
            runtime.on_results(&self.results);
        } else {
            runtime.on_solved_results(&self.results, self.face, self.pose);
        }
    }
}

/// 检测结果录制
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    pub fps: f32,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let recording = Self::from_json_str(&text)?;
        log::info!(
            "加载录制: {} ({} 帧, {} fps, {:.2}s)",
            path.as_ref().display(),
            recording.len(),
            recording.fps,
            recording.duration()
        );
        Ok(recording)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let (fps, frames) = match value {
            Value::Array(frames) => (DEFAULT_FPS, frames),
            Value::Object(mut map) => {
                let fps = match map.remove("fps") {
                    Some(v) => v
                        .as_f64()
                        .map(|f| f as f32)
                        .ok_or_else(|| MocapError::Recording("fps must be a number".to_string()))?,
                    None => DEFAULT_FPS,
                };
                match map.remove("frames") {
                    Some(Value::Array(frames)) => (fps, frames),
                    _ => return Err(MocapError::Recording("missing frames array".to_string())),
                }
            }
            _ => return Err(MocapError::Recording("expected an array or an object".to_string())),
        };

        if !fps.is_finite() || fps <= 0.0 {
            return Err(MocapError::Recording(format!("invalid fps {}", fps)));
        }

        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| parse_frame(i, frame))
            .collect();

        Ok(Self { fps, frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// 时长（秒）
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 / self.fps
    }

    /// 播放时间对应的帧，超出时长后循环
    pub fn frame_at(&self, time: f32) -> Option<&RecordedFrame> {
        self.frame_index_at(time).and_then(|i| self.frames.get(i))
    }

    /// 播放时间对应的帧序号（循环）
    pub fn frame_index_at(&self, time: f32) -> Option<usize> {
        if self.frames.is_empty() || !time.is_finite() {
            return None;
        }
        Some((time.max(0.0) * self.fps).floor() as usize % self.frames.len())
    }
}

// 单帧格式错误时按空帧处理，不中断整个录制
fn parse_frame(index: usize, value: Value) -> RecordedFrame {
    match serde_json::from_value(value) {
        Ok(frame) => frame,
        Err(e) => {
            log::warn!("录制第 {} 帧格式错误，按空帧处理: {}", index, e);
            RecordedFrame::default()
        }
    }
}
