//! 宿主绘图能力抽象
//!
//! 形似 HTML canvas 2D context 的最小接口。场景节点只通过它绘制，
//! 拾取缓冲区与可见缓冲区各持有一个实例。

use crate::text::FontSpec;
use crate::{Color, Size};

pub trait DrawingContext {
    fn size(&self) -> Size;

    /// 调整尺寸，内容与变换状态一并清空
    fn resize(&mut self, width: u32, height: u32);

    /// 压栈：变换、填充/描边样式、字体
    fn save(&mut self);

    /// 出栈；栈为空时不做任何事
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn set_fill_style(&mut self, color: Color);
    fn set_stroke_style(&mut self, color: Color);
    fn set_font(&mut self, font: &FontSpec);

    /// 把区域内像素恢复为全透明
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// `y` 为基线
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);

    /// 读取设备坐标处的像素，越界返回透明色
    fn read_pixel(&self, x: i32, y: i32) -> Color;
}
