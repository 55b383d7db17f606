//! 节点属性与事件回调

use super::NodeId;
use crate::event::{EventContext, EventKind, PointerEvent};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// 浅合并的键值表，props 与 state 共用
pub type PropMap = serde_json::Map<String, Value>;

/// 事件回调；`ctx` 即接收者节点
pub type Handler = Rc<dyn Fn(&mut EventContext<'_>, &PointerEvent)>;

/// 每种事件至多一个回调
#[derive(Clone, Default)]
pub struct EventHandlers {
    pub on_click: Option<Handler>,
    pub on_mouse_enter: Option<Handler>,
    pub on_mouse_exit: Option<Handler>,
    pub on_mouse_move: Option<Handler>,
}

impl EventHandlers {
    pub fn get(&self, kind: EventKind) -> Option<&Handler> {
        match kind {
            EventKind::Click => self.on_click.as_ref(),
            EventKind::MouseEnter => self.on_mouse_enter.as_ref(),
            EventKind::MouseExit => self.on_mouse_exit.as_ref(),
            EventKind::MouseMove => self.on_mouse_move.as_ref(),
        }
    }

    pub fn set(&mut self, kind: EventKind, handler: Handler) {
        let slot = match kind {
            EventKind::Click => &mut self.on_click,
            EventKind::MouseEnter => &mut self.on_mouse_enter,
            EventKind::MouseExit => &mut self.on_mouse_exit,
            EventKind::MouseMove => &mut self.on_mouse_move,
        };
        *slot = Some(handler);
    }

    /// 用 `other` 中已设置的回调覆盖自身
    pub fn merge(&mut self, other: &EventHandlers) {
        for kind in EventKind::ALL {
            if let Some(handler) = other.get(kind) {
                self.set(kind, handler.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        EventKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<&str> = EventKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .map(|kind| kind.handler_name())
            .collect();
        f.debug_tuple("EventHandlers").field(&set).finish()
    }
}

macro_rules! handler_builders {
    ($($name:ident => $kind:expr),* $(,)?) => {
        $(
            pub fn $name<F>(mut self, handler: F) -> Self
            where
                F: Fn(&mut EventContext<'_>, &PointerEvent) + 'static,
            {
                self.handlers.set($kind, Rc::new(handler));
                self
            }
        )*
    };
}

/// 节点属性：键值、事件回调、子节点
///
/// 子节点只在构建时读取；之后拓扑固定，更新用 [`PropsPatch`]，它不携带子节点。
#[derive(Debug, Clone, Default)]
pub struct Props {
    pub values: PropMap,
    pub handlers: EventHandlers,
    pub children: Vec<NodeId>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn child(mut self, id: NodeId) -> Self {
        self.children.push(id);
        self
    }

    handler_builders! {
        on_click => EventKind::Click,
        on_mouse_enter => EventKind::MouseEnter,
        on_mouse_exit => EventKind::MouseExit,
        on_mouse_move => EventKind::MouseMove,
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// 数值属性；非数值视为缺省
    pub fn number(&self, key: &str) -> Option<f32> {
        self.values.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// 浅合并：新键加入，已有键覆盖，其余保留
    pub(crate) fn merge(&mut self, patch: &PropsPatch) {
        self.values.extend(patch.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.handlers.merge(&patch.handlers);
    }
}

/// `json!({...})` 对象转为属性；非对象得到空属性
impl From<Value> for Props {
    fn from(value: Value) -> Self {
        Props { values: object_or_empty(value), ..Props::default() }
    }
}

/// 对 props 的部分更新
#[derive(Debug, Clone, Default)]
pub struct PropsPatch {
    pub values: PropMap,
    pub handlers: EventHandlers,
}

impl PropsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    handler_builders! {
        on_click => EventKind::Click,
        on_mouse_enter => EventKind::MouseEnter,
        on_mouse_exit => EventKind::MouseExit,
        on_mouse_move => EventKind::MouseMove,
    }
}

impl From<Value> for PropsPatch {
    fn from(value: Value) -> Self {
        PropsPatch { values: object_or_empty(value), ..PropsPatch::default() }
    }
}

/// `json!({...})` 转为 [`PropMap`]
pub fn prop_map(value: Value) -> PropMap {
    object_or_empty(value)
}

fn object_or_empty(value: Value) -> PropMap {
    match value {
        Value::Object(map) => map,
        other => {
            log::warn!("expected a JSON object for props, got {}", other);
            PropMap::new()
        }
    }
}
