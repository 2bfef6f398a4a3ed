//! 虚拟形象运行时管理

mod runtime;

pub use runtime::AvatarRuntime;
