//! Pick Render - 基于拾取缓冲区的保留模式场景渲染
//! 每个节点绘制两次：可见缓冲区用真实样式，拾取缓冲区用唯一的 id 颜色；
//! 指针事件通过读取拾取缓冲区像素找到最上层节点。

mod canvas;
mod color;
mod geometry;
mod paint;
pub mod text;

pub use canvas::{Canvas, RasterMode, MAX_CANVAS_PIXELS, MAX_CANVAS_SIDE};
pub use color::Color;
pub use geometry::{Rect, Size};
pub use paint::{Paint, PaintStyle};
pub use text::{FontSpec, TextRenderer};

// 宿主绘图能力
pub mod context;
pub use context::DrawingContext;

pub mod error;
pub use error::{ConfigError, Error, PaintError, Result, SceneError};

// 场景树
pub mod scene;

// 双缓冲绘制
pub mod surface;
pub use surface::DualSurface;

// 事件系统
pub mod event;

// 应用运行时
pub mod runtime;

// 单元测试
#[cfg(test)]
mod tests;
