//! 节点注册表 - id 分配与 id 颜色编码
//!
//! id 从 1 开始连续分配，0 留给背景像素（透明黑）。节点一旦注册便存活到
//! 注册表销毁为止，没有移除操作。

use super::node::Node;
use crate::error::SceneError;
use crate::Color;
use std::fmt;
use std::num::NonZeroU32;

/// 拾取缓冲区 24 位 RGB 能表示的最大 id
pub const MAX_NODE_ID: u32 = 0x00FF_FFFF;

/// 节点 id，恒不为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// 0 或超出颜色空间时返回 None
    pub fn new(raw: u32) -> Option<Self> {
        if raw > MAX_NODE_ID {
            return None;
        }
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// id -> 颜色：id 放在低 24 位
pub fn color_of(id: NodeId) -> Color {
    Color::from_hex(id.get())
}

/// 颜色 -> id，[`color_of`] 的逆。透明像素视为背景。
pub fn decode(color: Color) -> u32 {
    if color.a == 0 {
        return 0;
    }
    color.to_hex()
}

/// 节点注册表（节点仓库）
#[derive(Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配下一个 id 并存入由它构造的节点
    pub fn register_with(&mut self, build: impl FnOnce(NodeId) -> Node) -> Result<NodeId, SceneError> {
        let id = self.next_id()?;
        let node = build(id);
        debug_assert_eq!(node.id(), id);
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn next_id(&self) -> Result<NodeId, SceneError> {
        u32::try_from(self.nodes.len() + 1)
            .ok()
            .and_then(NodeId::new)
            .ok_or(SceneError::IdSpaceExhausted { max: MAX_NODE_ID })
    }

    /// 按解码出的原始 id 查找；背景或越界返回 None
    pub fn find(&self, raw: u32) -> Option<&Node> {
        NodeId::new(raw).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}
