//! 内置绘制变体

use super::node::{Node, Shape};
use super::props::{PropMap, Props};
use crate::context::DrawingContext;
use crate::error::PaintError;
use crate::text::FontSpec;

/// 矩形：`width`/`height` 取自 props，`color`/`borderColor` 取自 state
#[derive(Debug, Clone, Copy, Default)]
pub struct RectShape;

impl Shape for RectShape {
    fn name(&self) -> &'static str {
        "Rect"
    }

    fn initial_state(&self, props: &Props) -> PropMap {
        ["color", "borderColor"]
            .iter()
            .filter_map(|key| props.get(key).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    fn paint(&self, node: &Node, ctx: &mut dyn DrawingContext) -> Result<(), PaintError> {
        let props = node.props();
        let width = props.number("width").unwrap_or(0.0);
        let height = props.number("height").unwrap_or(0.0);

        if let Some(border) = node.state_color("borderColor")? {
            ctx.set_stroke_style(border);
            ctx.stroke_rect(0.0, 0.0, width, height);
        }

        if let Some(fill) = node.state_color("color")? {
            ctx.set_fill_style(fill);
            ctx.fill_rect(0.0, 0.0, width, height);
        }

        Ok(())
    }
}

/// 文本：`content`、`font`、`color`、`borderColor` 全部取自 props。
/// 基线位于节点原点下方一个字号处。
#[derive(Debug, Clone, Copy, Default)]
pub struct TextShape;

impl Shape for TextShape {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn paint(&self, node: &Node, ctx: &mut dyn DrawingContext) -> Result<(), PaintError> {
        let props = node.props();
        let content = props.str("content").unwrap_or_default();
        if content.is_empty() {
            return Ok(());
        }

        let font = props.str("font").map(FontSpec::parse).unwrap_or_default();
        let baseline = font.size;
        ctx.set_font(&font);

        if let Some(border) = node.prop_color("borderColor")? {
            ctx.set_stroke_style(border);
            ctx.stroke_text(content, 0.0, baseline);
        }

        if let Some(fill) = node.prop_color("color")? {
            ctx.set_fill_style(fill);
            ctx.fill_text(content, 0.0, baseline);
        }

        Ok(())
    }
}
