//! 双缓冲绘制：可见缓冲区 + 拾取缓冲区
//!
//! 两个缓冲区在同一次先序遍历里、以同一个变换栈绘制，因此拾取缓冲区的
//! 像素 (x, y) 总对应可见缓冲区中覆盖 (x, y) 的那个节点。后绘制的节点
//! 覆盖先绘制的节点，"最上层"由光栅覆盖顺序自然得到。

use crate::canvas::{Canvas, RasterMode};
use crate::context::DrawingContext;
use crate::error::PaintError;
use crate::scene::{decode, Node, NodeId, NodeRegistry, StyleOverride};
use crate::text::TextRenderer;
use crate::{Color, Size};
use serde_json::Value;
use std::sync::Arc;

pub struct DualSurface<C: DrawingContext = Canvas> {
    visible: C,
    pick: C,
}

impl DualSurface<Canvas> {
    /// 软件画布实现；拾取缓冲区使用 [`RasterMode::Exact`]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visible: Canvas::new(width, height),
            pick: Canvas::new(width, height).with_mode(RasterMode::Exact),
        }
    }

    pub fn with_text_renderer(mut self, text: Arc<TextRenderer>) -> Self {
        self.visible.set_text_renderer(Some(text.clone()));
        self.pick.set_text_renderer(Some(text));
        self
    }
}

impl<C: DrawingContext> DualSurface<C> {
    /// 由宿主提供的两个上下文组装；拾取上下文被调整为与可见上下文同尺寸
    pub fn from_contexts(visible: C, mut pick: C) -> Self {
        let size = visible.size();
        if pick.size() != size {
            log::warn!("pick context {:?} resized to match visible {:?}", pick.size(), size);
            pick.resize(size.width, size.height);
        }
        Self { visible, pick }
    }

    pub fn size(&self) -> Size {
        self.visible.size()
    }

    pub fn visible(&self) -> &C {
        &self.visible
    }

    pub fn pick(&self) -> &C {
        &self.pick
    }

    /// 两个缓冲区一起调整尺寸；内容作废，直到下一次完整重绘
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resize surfaces to {}x{}", width, height);
        self.visible.resize(width, height);
        self.pick.resize(width, height);
    }

    /// 两个缓冲区清为背景（透明）
    pub fn clear(&mut self) {
        let size = self.size();
        let (w, h) = (size.width as f32, size.height as f32);
        self.visible.clear_rect(0.0, 0.0, w, h);
        self.pick.clear_rect(0.0, 0.0, w, h);
    }

    /// 从 `root` 开始先序遍历绘制整棵树。
    ///
    /// 遍历使用显式工作栈，树深度不受调用栈限制。无论正常结束、出错还是
    /// panic，两个缓冲区的保存栈都回到调用前的深度。
    pub fn render_tree(&mut self, registry: &mut NodeRegistry, root: NodeId) -> Result<(), PaintError> {
        let mut scope = SaveScope::new(&mut self.visible, &mut self.pick);
        let mut work = vec![Step::Enter(root)];

        while let Some(step) = work.pop() {
            let id = match step {
                Step::Leave => {
                    scope.restore();
                    continue;
                }
                Step::Enter(id) => id,
            };

            scope.save();
            let node = registry.get_mut(id).ok_or(PaintError::UnknownNode(id))?;
            let (dx, dy) = node.offset();
            scope.translate(dx, dy);

            node.paint(&mut *scope.visible, None)?;
            let overrides = pick_overrides(node);
            node.paint(&mut *scope.pick, Some(&overrides))?;

            work.push(Step::Leave);
            work.extend(node.children().iter().rev().map(|&child| Step::Enter(child)));
        }
        Ok(())
    }

    /// 读取拾取缓冲区一个像素并解码为 id，背景为 0
    pub fn pick_at(&self, x: f32, y: f32) -> u32 {
        if !x.is_finite() || !y.is_finite() {
            return 0;
        }
        decode(self.pick.read_pixel(x.floor() as i32, y.floor() as i32))
    }

    /// 可见缓冲区中的颜色
    pub fn visible_at(&self, x: f32, y: f32) -> Color {
        if !x.is_finite() || !y.is_finite() {
            return Color::TRANSPARENT;
        }
        self.visible.read_pixel(x.floor() as i32, y.floor() as i32)
    }
}

/// 拾取绘制时把填充色与描边色都替换为节点的 id 颜色
fn pick_overrides(node: &Node) -> StyleOverride {
    let css = Value::String(node.id_color().to_css());
    StyleOverride::recolor(node, &["color", "borderColor"], &css)
}

enum Step {
    Enter(NodeId),
    Leave,
}

/// 成对地对两个上下文 save/translate/restore；Drop 时弹出剩余的保存层
struct SaveScope<'a, C: DrawingContext> {
    visible: &'a mut C,
    pick: &'a mut C,
    depth: usize,
}

impl<'a, C: DrawingContext> SaveScope<'a, C> {
    fn new(visible: &'a mut C, pick: &'a mut C) -> Self {
        Self { visible, pick, depth: 0 }
    }

    fn save(&mut self) {
        self.visible.save();
        self.pick.save();
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.visible.restore();
        self.pick.restore();
        self.depth -= 1;
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.visible.translate(dx, dy);
        self.pick.translate(dx, dy);
    }
}

impl<C: DrawingContext> Drop for SaveScope<'_, C> {
    fn drop(&mut self) {
        if self.depth > 0 {
            log::debug!("unwinding {} unbalanced save levels", self.depth);
        }
        while self.depth > 0 {
            self.restore();
        }
    }
}
