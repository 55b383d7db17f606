//! 指针路由测试

use super::{init_logging, rect_props};
use crate::event::{EventKind, PointerRouter};
use crate::runtime::App;
use crate::scene::{prop_map, NodeId, Props, PropsPatch, Scene};
use crate::DualSurface;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

type EventLog = Rc<RefCell<Vec<String>>>;

/// 为节点挂上全部四种回调，每次调用记一行 "<name>:<kind>"
fn logged(props: Props, name: &'static str, log: &EventLog) -> Props {
    let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
    props
        .on_click(move |_, _| a.borrow_mut().push(format!("{}:click", name)))
        .on_mouse_enter(move |_, _| b.borrow_mut().push(format!("{}:enter", name)))
        .on_mouse_exit(move |_, _| c.borrow_mut().push(format!("{}:exit", name)))
        .on_mouse_move(move |_, _| d.borrow_mut().push(format!("{}:move", name)))
}

struct Fixture {
    scene: Scene,
    surface: DualSurface,
    router: PointerRouter,
    log: EventLog,
    a: NodeId,
    b: NodeId,
}

impl Fixture {
    /// 两个相邻矩形 A (0..40) 与 B (50..90)，根节点带回调但不可见
    fn new() -> Self {
        init_logging();
        let log: EventLog = Rc::default();
        let mut scene = Scene::new();
        let a = scene.rect(logged(rect_props(0, 0, 40, 40, "#ff0000"), "A", &log), []).unwrap();
        let b = scene.rect(logged(rect_props(50, 0, 40, 40, "#0000ff"), "B", &log), []).unwrap();
        let root = scene.rect(logged(Props::new(), "root", &log), [a, b]).unwrap();

        let mut surface = DualSurface::new(100, 50);
        surface.render_tree(scene.registry_mut(), root).unwrap();
        Self { scene, surface, router: PointerRouter::new(), log, a, b }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.router.pointer_move(x, y, &self.surface, &mut self.scene);
    }

    fn click(&mut self) {
        self.router.click(&mut self.scene);
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

#[test]
fn test_enter_then_move_on_first_hover() {
    let mut fx = Fixture::new();

    fx.move_to(10.0, 10.0);

    assert_eq!(fx.take(), vec!["A:enter", "A:move"]);
    assert_eq!(fx.router.hovered(), Some(fx.a));
    assert_eq!(fx.router.position(), (10.0, 10.0));
}

#[test]
fn test_exit_before_enter_when_target_changes() {
    let mut fx = Fixture::new();
    fx.move_to(10.0, 10.0);
    fx.take();

    fx.move_to(60.0, 10.0);

    assert_eq!(fx.take(), vec!["A:exit", "B:enter", "B:move"]);
    assert_eq!(fx.router.hovered(), Some(fx.b));
}

#[test]
fn test_move_within_target_only_moves() {
    let mut fx = Fixture::new();
    fx.move_to(10.0, 10.0);
    fx.take();

    fx.move_to(20.0, 30.0);
    fx.move_to(39.0, 39.0);

    assert_eq!(fx.take(), vec!["A:move", "A:move"]);
}

#[test]
fn test_leaving_to_background_clears_hover() {
    let mut fx = Fixture::new();
    fx.move_to(10.0, 10.0);
    fx.take();

    // 间隙处是背景；根节点不可见所以不会收到事件
    fx.move_to(45.0, 10.0);

    assert_eq!(fx.take(), vec!["A:exit"]);
    assert_eq!(fx.router.hovered(), None);

    fx.move_to(46.0, 10.0);
    assert!(fx.take().is_empty());
}

#[test]
fn test_click_reuses_hovered_target() {
    let mut fx = Fixture::new();
    fx.move_to(60.0, 10.0);
    fx.take();

    fx.click();
    fx.click();

    assert_eq!(fx.take(), vec!["B:click", "B:click"]);
}

#[test]
fn test_click_without_hover_does_nothing() {
    let mut fx = Fixture::new();

    fx.click();
    fx.move_to(45.0, 45.0);
    fx.click();

    assert!(fx.take().is_empty());
    assert!(!fx.scene.has_pending());
}

#[test]
fn test_click_does_not_bubble_to_parent() {
    let log: EventLog = Rc::default();
    let mut scene = Scene::new();
    let child = scene.rect(logged(rect_props(10, 10, 10, 10, "#00ff00"), "child", &log), []).unwrap();
    let parent = scene.rect(logged(rect_props(0, 0, 40, 40, "#ff0000"), "parent", &log), [child]).unwrap();
    let mut surface = DualSurface::new(50, 50);
    surface.render_tree(scene.registry_mut(), parent).unwrap();
    let mut router = PointerRouter::new();

    router.pointer_move(15.0, 15.0, &surface, &mut scene);
    router.click(&mut scene);

    assert_eq!(log.borrow().as_slice(), &["child:enter", "child:move", "child:click"]);
}

#[test]
fn test_handler_sees_state_before_flush() {
    let mut scene = Scene::new();
    let seen: Rc<RefCell<Vec<Option<i64>>>> = Rc::default();
    let sink = seen.clone();
    let props = rect_props(0, 0, 20, 20, "#ff0000").on_click(move |ctx, _| {
        ctx.set_state(prop_map(json!({ "clicks": 1 })));
        sink.borrow_mut().push(ctx.state().get("clicks").and_then(|v| v.as_i64()));
    });
    let id = scene.rect(props, []).unwrap();
    let mut surface = DualSurface::new(20, 20);
    surface.render_tree(scene.registry_mut(), id).unwrap();
    let mut router = PointerRouter::new();

    router.pointer_move(5.0, 5.0, &surface, &mut scene);
    router.click(&mut scene);

    // 自己发起的修改在回调内不可见
    assert_eq!(seen.borrow().as_slice(), &[None]);
    assert!(scene.has_pending());

    scene.flush();
    assert_eq!(scene.get(id).unwrap().state().get("clicks"), Some(&json!(1)));
}

#[test]
fn test_handler_receives_event_position() {
    let mut scene = Scene::new();
    let seen: Rc<RefCell<Vec<(EventKind, f32, f32, NodeId)>>> = Rc::default();
    let sink = seen.clone();
    let props = rect_props(0, 0, 20, 20, "#ff0000")
        .on_mouse_move(move |ctx, e| sink.borrow_mut().push((e.kind, e.x, e.y, ctx.id())));
    let id = scene.rect(props, []).unwrap();
    let mut surface = DualSurface::new(20, 20);
    surface.render_tree(scene.registry_mut(), id).unwrap();

    PointerRouter::new().pointer_move(7.5, 3.0, &surface, &mut scene);

    assert_eq!(seen.borrow().as_slice(), &[(EventKind::MouseMove, 7.5, 3.0, id)]);
}

#[test]
fn test_emit_without_handler() {
    let mut scene = Scene::new();
    let bare = scene.rect(rect_props(0, 0, 5, 5, "#ff0000"), []).unwrap();
    let ghost = NodeId::new(77).unwrap();

    assert!(!PointerRouter::emit(EventKind::Click, Some(bare), 0.0, 0.0, &mut scene));
    assert!(!PointerRouter::emit(EventKind::Click, Some(ghost), 0.0, 0.0, &mut scene));
    assert!(!PointerRouter::emit(EventKind::Click, None, 0.0, 0.0, &mut scene));
}

#[test]
fn test_handler_can_update_other_nodes() {
    let mut scene = Scene::new();
    let target = scene.rect(rect_props(30, 0, 10, 10, "#00ff00"), []).unwrap();
    let props = rect_props(0, 0, 10, 10, "#ff0000").on_click(move |ctx, _| {
        ctx.request_update(target, None, Some(prop_map(json!({ "color": "#123456" }))));
    });
    let button = scene.rect(props, []).unwrap();

    assert!(PointerRouter::emit(EventKind::Click, Some(button), 1.0, 1.0, &mut scene));
    scene.flush();

    assert_eq!(scene.get(target).unwrap().state().get("color"), Some(&json!("#123456")));
}

#[test]
fn test_handler_props_update_moves_node_next_frame() {
    init_logging();
    let mut scene = Scene::new();
    let seen: Rc<RefCell<Vec<Option<f32>>>> = Rc::default();
    let sink = seen.clone();
    let props = rect_props(0, 0, 10, 10, "#ff0000").on_click(move |ctx, _| {
        ctx.set_props(PropsPatch::new().set("left", 60));
        sink.borrow_mut().push(ctx.props().number("left"));
    });
    let id = scene.rect(props, []).unwrap();
    let mut app = App::new(scene, id, DualSurface::new(80, 20));
    app.start().unwrap();

    app.pointer_move(5.0, 5.0);
    app.click();

    // 回调内仍是旧值，绘制结果也尚未变化
    assert_eq!(seen.borrow().as_slice(), &[Some(0.0)]);
    assert_eq!(app.pick_at(5.0, 5.0), id.get());
    assert!(app.is_dirty());

    assert!(app.tick().unwrap());
    let node = app.scene().get(id).unwrap();
    assert_eq!(node.props().number("left"), Some(60.0));
    assert_eq!(node.props().str("color"), Some("#ff0000"));
    assert_eq!(app.pick_at(5.0, 5.0), 0);
    assert_eq!(app.pick_at(65.0, 5.0), id.get());
}
