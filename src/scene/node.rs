//! 场景节点

use super::props::{PropMap, Props, PropsPatch};
use super::registry::{color_of, NodeId};
use crate::context::DrawingContext;
use crate::error::PaintError;
use crate::Color;
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

/// 节点的绘制变体（矩形、文本……）
///
/// 变体只决定画什么、从 props 还是 state 读取样式；平移、保存/恢复由渲染器负责。
pub trait Shape {
    fn name(&self) -> &'static str;

    /// 构建时从 props 派生的初始 state
    fn initial_state(&self, props: &Props) -> PropMap {
        let _ = props;
        PropMap::new()
    }

    /// 在已平移到节点原点的上下文中绘制
    fn paint(&self, node: &Node, ctx: &mut dyn DrawingContext) -> Result<(), PaintError>;
}

pub struct Node {
    id: NodeId,
    shape: Box<dyn Shape>,
    props: Props,
    state: PropMap,
    parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, shape: Box<dyn Shape>, props: Props) -> Self {
        let state = shape.initial_state(&props);
        Self { id, shape, props, state, parent: None }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// 拾取缓冲区中代表本节点的颜色
    pub fn id_color(&self) -> Color {
        color_of(self.id)
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape.name()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn state(&self) -> &PropMap {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.props.children
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        debug_assert!(self.parent.is_none());
        self.parent = Some(parent);
    }

    /// 相对父节点的偏移 (`left`, `top`)，按整数截断，缺省为 0
    pub fn offset(&self) -> (f32, f32) {
        let left = self.props.number("left").unwrap_or(0.0).trunc();
        let top = self.props.number("top").unwrap_or(0.0).trunc();
        (left, top)
    }

    /// 从 state 取颜色；缺省或 null 表示不绘制
    pub fn state_color(&self, key: &'static str) -> Result<Option<Color>, PaintError> {
        match self.state.get(key) {
            Some(value) => self.parse_color(key, value),
            None => Ok(None),
        }
    }

    /// 只从 props 取颜色
    pub fn prop_color(&self, key: &'static str) -> Result<Option<Color>, PaintError> {
        match self.props.get(key) {
            Some(value) => self.parse_color(key, value),
            None => Ok(None),
        }
    }

    fn parse_color(&self, key: &'static str, value: &Value) -> Result<Option<Color>, PaintError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Color::parse(s).map(Some).ok_or_else(|| PaintError::InvalidColor {
                node: self.id,
                key,
                value: value.to_string(),
            }),
            other => Err(PaintError::InvalidColor { node: self.id, key, value: other.to_string() }),
        }
    }

    pub(crate) fn apply_update(&mut self, next_props: Option<&PropsPatch>, next_state: Option<&PropMap>) {
        if let Some(patch) = next_props {
            self.props.merge(patch);
        }
        if let Some(patch) = next_state {
            self.state.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    /// 绘制节点。`overrides` 在本次调用期间临时合并进 props 与 state，
    /// 返回（包括出错、panic）时一定恢复。
    pub fn paint(&mut self, ctx: &mut dyn DrawingContext, overrides: Option<&StyleOverride>) -> Result<(), PaintError> {
        match overrides {
            Some(overrides) => {
                let scoped = PaintOverride::apply(self, overrides);
                scoped.shape.paint(&scoped, ctx)
            }
            None => self.shape.paint(self, ctx),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("shape", &self.shape.name())
            .field("props", &self.props)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .finish()
    }
}

/// 绘制期间对 props 与 state 的临时覆盖
#[derive(Debug, Clone, Default)]
pub struct StyleOverride {
    pub props: PropMap,
    pub state: PropMap,
}

impl StyleOverride {
    /// 同一组值同时覆盖 props 与 state
    pub fn both(values: PropMap) -> Self {
        Self { props: values.clone(), state: values }
    }

    /// 把 `keys` 中节点已有的非空样式值替换为 `value`，
    /// 缺省的样式保持缺省，这样不可见的部分在拾取缓冲区里同样不可见
    pub fn recolor(node: &Node, keys: &[&str], value: &Value) -> Self {
        let pick = |map: &PropMap| -> PropMap {
            keys.iter()
                .filter(|key| map.get(**key).is_some_and(|v| !v.is_null()))
                .map(|key| (key.to_string(), value.clone()))
                .collect()
        };
        Self { props: pick(&node.props.values), state: pick(&node.state) }
    }
}

/// props/state 的临时覆盖，Drop 时还原快照
pub(crate) struct PaintOverride<'a> {
    node: &'a mut Node,
    saved: Option<(PropMap, PropMap)>,
}

impl<'a> PaintOverride<'a> {
    pub(crate) fn apply(node: &'a mut Node, overrides: &StyleOverride) -> Self {
        let mut props = node.props.values.clone();
        let mut state = node.state.clone();
        props.extend(overrides.props.iter().map(|(k, v)| (k.clone(), v.clone())));
        state.extend(overrides.state.iter().map(|(k, v)| (k.clone(), v.clone())));

        let saved_props = std::mem::replace(&mut node.props.values, props);
        let saved_state = std::mem::replace(&mut node.state, state);
        Self { node, saved: Some((saved_props, saved_state)) }
    }
}

impl Deref for PaintOverride<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

impl Drop for PaintOverride<'_> {
    fn drop(&mut self) {
        if let Some((props, state)) = self.saved.take() {
            self.node.props.values = props;
            self.node.state = state;
        }
    }
}
