//! 场景树：节点注册表 + 延迟更新队列

mod node;
mod props;
mod registry;
mod shapes;
mod update;

pub use node::{Node, Shape, StyleOverride};
pub use props::{prop_map, EventHandlers, Handler, PropMap, Props, PropsPatch};
pub use registry::{color_of, decode, NodeId, NodeRegistry, MAX_NODE_ID};
pub use shapes::{RectShape, TextShape};
pub use update::{PendingUpdate, UpdateQueue};

use crate::error::SceneError;
use std::collections::HashSet;

/// 一个独立的场景：拥有全部节点与待应用的修改
#[derive(Default)]
pub struct Scene {
    registry: NodeRegistry,
    updates: UpdateQueue,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明式构建：`props.children` 在前、`children` 在后，全部挂到新节点下。
    ///
    /// 子节点必须已注册且尚无父节点；校验失败时不注册任何东西。
    pub fn create(
        &mut self,
        shape: impl Shape + 'static,
        mut props: Props,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, SceneError> {
        props.children.extend(children);

        let mut seen = HashSet::with_capacity(props.children.len());
        for &child in &props.children {
            let node = self.registry.get(child).ok_or(SceneError::UnknownNode(child))?;
            if let Some(parent) = node.parent() {
                return Err(SceneError::AlreadyParented { child, parent });
            }
            if !seen.insert(child) {
                return Err(SceneError::DuplicateChild(child));
            }
        }

        let children = props.children.clone();
        let id = self.registry.register_with(|id| Node::new(id, Box::new(shape), props))?;
        for child in children {
            if let Some(node) = self.registry.get_mut(child) {
                node.set_parent(id);
            }
        }

        log::trace!("created node {}", id);
        Ok(id)
    }

    pub fn rect(&mut self, props: Props, children: impl IntoIterator<Item = NodeId>) -> Result<NodeId, SceneError> {
        self.create(RectShape, props, children)
    }

    pub fn text(&mut self, props: Props) -> Result<NodeId, SceneError> {
        self.create(TextShape, props, std::iter::empty())
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.registry.get(id)
    }

    pub fn updates(&self) -> &UpdateQueue {
        &self.updates
    }

    /// 同时借出注册表（只读）与更新队列（可写），供事件分发使用
    pub fn split_mut(&mut self) -> (&NodeRegistry, &mut UpdateQueue) {
        (&self.registry, &mut self.updates)
    }

    pub fn request_update(&mut self, target: NodeId, next_props: Option<PropsPatch>, next_state: Option<PropMap>) {
        self.updates.request_update(target, next_props, next_state);
    }

    pub fn request_state_change(&mut self, target: NodeId, next_state: PropMap) {
        self.updates.request_state_change(target, next_state);
    }

    pub fn has_pending(&self) -> bool {
        self.updates.has_pending()
    }

    /// 应用全部待处理修改
    pub fn flush(&mut self) -> usize {
        self.updates.apply_all(&mut self.registry)
    }
}
