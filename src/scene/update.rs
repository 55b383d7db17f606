//! 延迟更新队列
//!
//! 回调里发起的修改只入队，下一帧开始绘制前一次性应用。

use super::props::{PropMap, PropsPatch};
use super::registry::{NodeId, NodeRegistry};

/// 一条待应用的修改
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub target: NodeId,
    pub next_props: Option<PropsPatch>,
    pub next_state: Option<PropMap>,
}

#[derive(Debug, Default)]
pub struct UpdateQueue {
    pending: Vec<PendingUpdate>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队，不会立即生效
    pub fn request_update(&mut self, target: NodeId, next_props: Option<PropsPatch>, next_state: Option<PropMap>) {
        self.pending.push(PendingUpdate { target, next_props, next_state });
    }

    pub fn request_state_change(&mut self, target: NodeId, next_state: PropMap) {
        self.request_update(target, None, Some(next_state));
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> &[PendingUpdate] {
        &self.pending
    }

    /// 按提交顺序浅合并全部修改并清空队列，返回应用条数。
    /// 目标不在注册表中的修改被跳过。
    pub fn apply_all(&mut self, registry: &mut NodeRegistry) -> usize {
        let mut applied = 0;
        for update in self.pending.drain(..) {
            match registry.get_mut(update.target) {
                Some(node) => {
                    node.apply_update(update.next_props.as_ref(), update.next_state.as_ref());
                    applied += 1;
                }
                None => log::warn!("dropping update for unknown node {}", update.target),
            }
        }
        applied
    }
}
