//! 回放录制的检测结果，驱动标准人形骨骼并输出最终姿态
//!
//! 用法: replay <recording.json> [config.json]

use std::env;

use anyhow::{bail, Context, Result};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use avatar_mocap::{AvatarRuntime, BoneManager, Expression, HumanoidBone, Recording, RetargetConfig};

/// 渲染帧率
const RENDER_FPS: f32 = 60.0;

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: {} <recording.json> [config.json]", args[0]);
    }

    let recording = Recording::load(&args[1]).with_context(|| format!("failed to load recording {}", args[1]))?;
    let config = match args.get(2) {
        Some(path) => RetargetConfig::load(path).with_context(|| format!("failed to load config {}", path))?,
        None => RetargetConfig::default(),
    };

    if recording.is_empty() {
        log::warn!("录制为空，没有可回放的帧");
        return Ok(());
    }

    let mut runtime = AvatarRuntime::new(BoneManager::humanoid(), config);
    let delta = 1.0 / RENDER_FPS;
    let render_frames = (recording.duration() * RENDER_FPS).ceil() as usize;

    // 检测帧率低于渲染帧率，同一检测帧只投递一次
    let mut last_delivered = None;
    for i in 0..render_frames {
        let time = i as f32 * delta;
        if let Some(index) = recording.frame_index_at(time) {
            if last_delivered != Some(index) {
                recording.frames[index].deliver(&mut runtime);
                last_delivered = Some(index);
            }
        }
        runtime.update(delta);
    }

    log::info!("回放完成: {} 渲染帧", runtime.frame_count());
    for bone in [
        HumanoidBone::Neck,
        HumanoidBone::Spine,
        HumanoidBone::Hips,
        HumanoidBone::LeftUpperArm,
        HumanoidBone::LeftLowerArm,
        HumanoidBone::RightUpperArm,
        HumanoidBone::RightLowerArm,
    ] {
        if let Some(r) = runtime.bone_rotation(bone.name()) {
            log::info!("  {:<14} ({:+.3}, {:+.3}, {:+.3})", bone.name(), r.x, r.y, r.z);
        }
    }
    for expression in Expression::ALL {
        log::info!("  {:<14} {:.3}", expression.name(), runtime.expression_weight(expression));
    }
    log::info!("  检测状态: {:?}", runtime.detection_status());
    let missing = runtime.missing_bones();
    if !missing.is_empty() {
        log::warn!("缺失骨骼: {}", missing.join(", "));
    }

    Ok(())
}
