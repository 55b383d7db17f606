//! 事件系统 - 基于拾取缓冲区的指针事件路由

use crate::context::DrawingContext;
use crate::scene::{Node, NodeId, PropMap, Props, PropsPatch, Scene, UpdateQueue};
use crate::surface::DualSurface;

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseEnter,
    MouseExit,
    MouseMove,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Click,
        EventKind::MouseEnter,
        EventKind::MouseExit,
        EventKind::MouseMove,
    ];

    /// props 中对应回调的名字
    pub fn handler_name(&self) -> &'static str {
        match self {
            EventKind::Click => "onClick",
            EventKind::MouseEnter => "onMouseEnter",
            EventKind::MouseExit => "onMouseExit",
            EventKind::MouseMove => "onMouseMove",
        }
    }
}

/// 指针事件数据（表面坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: EventKind,
    pub x: f32,
    pub y: f32,
}

/// 回调中的接收者：只读访问节点，修改只能入队
pub struct EventContext<'a> {
    node: &'a Node,
    updates: &'a mut UpdateQueue,
}

impl<'a> EventContext<'a> {
    pub fn new(node: &'a Node, updates: &'a mut UpdateQueue) -> Self {
        Self { node, updates }
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn node(&self) -> &Node {
        self.node
    }

    pub fn props(&self) -> &Props {
        self.node.props()
    }

    pub fn state(&self) -> &PropMap {
        self.node.state()
    }

    /// 下一帧生效
    pub fn set_state(&mut self, next_state: PropMap) {
        self.updates.request_state_change(self.node.id(), next_state);
    }

    /// 下一帧生效
    pub fn set_props(&mut self, next_props: PropsPatch) {
        self.updates.request_update(self.node.id(), Some(next_props), None);
    }

    /// 对任意节点发起修改
    pub fn request_update(&mut self, target: NodeId, next_props: Option<PropsPatch>, next_state: Option<PropMap>) {
        self.updates.request_update(target, next_props, next_state);
    }
}

/// 指针状态
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub hovered: Option<NodeId>,
}

/// 指针路由：移动时取样拾取缓冲区，计算进入/离开
#[derive(Debug, Default)]
pub struct PointerRouter {
    state: PointerState,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.state.hovered
    }

    pub fn position(&self) -> (f32, f32) {
        (self.state.x, self.state.y)
    }

    /// 目标变化时先 exit 旧目标再 enter 新目标，随后总是向新目标发 move
    pub fn pointer_move<C: DrawingContext>(&mut self, x: f32, y: f32, surface: &DualSurface<C>, scene: &mut Scene) {
        self.state.x = x;
        self.state.y = y;

        let next_id = surface.pick_at(x, y);
        let next = scene.registry().find(next_id).map(Node::id);
        let prev = std::mem::replace(&mut self.state.hovered, next);

        if prev != next {
            log::debug!("hover {:?} -> {:?} at ({}, {})", prev, next, x, y);
            Self::emit(EventKind::MouseExit, prev, x, y, scene);
            Self::emit(EventKind::MouseEnter, next, x, y, scene);
        }
        Self::emit(EventKind::MouseMove, next, x, y, scene);
    }

    /// 点击直接复用最近一次悬停结果，不重新取样
    pub fn click(&mut self, scene: &mut Scene) {
        let PointerState { x, y, hovered } = self.state;
        Self::emit(EventKind::Click, hovered, x, y, scene);
    }

    /// 调用目标自身的回调，不向祖先冒泡。返回是否有回调被调用。
    pub fn emit(kind: EventKind, target: Option<NodeId>, x: f32, y: f32, scene: &mut Scene) -> bool {
        let Some(target) = target else {
            return false;
        };
        let (registry, updates) = scene.split_mut();
        let Some(node) = registry.get(target) else {
            return false;
        };
        let Some(handler) = node.props().handlers.get(kind) else {
            return false;
        };

        let event = PointerEvent { kind, x, y };
        let mut ctx = EventContext::new(node, updates);
        handler(&mut ctx, &event);
        true
    }
}
