//! 延迟更新队列测试

use super::rect_props;
use crate::scene::{prop_map, NodeId, Props, PropsPatch, Scene};
use serde_json::json;

fn single_rect() -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let id = scene.rect(rect_props(0, 0, 10, 10, "#ff0000"), []).unwrap();
    (scene, id)
}

#[test]
fn test_update_is_deferred_until_flush() {
    let (mut scene, id) = single_rect();

    scene.request_state_change(id, prop_map(json!({ "a": 1 })));
    assert!(scene.has_pending());
    assert!(scene.get(id).unwrap().state().get("a").is_none());

    assert_eq!(scene.flush(), 1);
    assert!(!scene.has_pending());

    let state = scene.get(id).unwrap().state();
    assert_eq!(state.get("a"), Some(&json!(1)));
    // 无关键保持不变
    assert_eq!(state.get("color"), Some(&json!("#ff0000")));
}

#[test]
fn test_later_update_wins_on_overlap() {
    let (mut scene, id) = single_rect();

    scene.request_state_change(id, prop_map(json!({ "color": "#111111", "x": 1 })));
    scene.request_state_change(id, prop_map(json!({ "color": "#222222" })));
    assert_eq!(scene.updates().len(), 2);
    assert!(scene.updates().pending().iter().all(|u| u.target == id && u.next_props.is_none()));

    assert_eq!(scene.flush(), 2);
    let state = scene.get(id).unwrap().state();
    assert_eq!(state.get("color"), Some(&json!("#222222")));
    assert_eq!(state.get("x"), Some(&json!(1)));
}

#[test]
fn test_props_merge_is_shallow() {
    let (mut scene, id) = single_rect();

    scene.request_update(id, Some(PropsPatch::new().set("width", 50)), None);
    scene.flush();

    let props = scene.get(id).unwrap().props();
    assert_eq!(props.number("width"), Some(50.0));
    assert_eq!(props.number("height"), Some(10.0));
    assert_eq!(props.str("color"), Some("#ff0000"));
}

#[test]
fn test_props_and_state_in_one_update() {
    let (mut scene, id) = single_rect();

    scene.request_update(
        id,
        Some(PropsPatch::from(json!({ "left": 5 }))),
        Some(prop_map(json!({ "borderColor": "#000000" }))),
    );
    scene.flush();

    let node = scene.get(id).unwrap();
    assert_eq!(node.offset(), (5.0, 0.0));
    assert_eq!(node.state().get("borderColor"), Some(&json!("#000000")));
}

#[test]
fn test_props_update_can_add_handler() {
    let (mut scene, id) = single_rect();
    assert!(scene.get(id).unwrap().props().handlers.is_empty());

    scene.request_update(id, Some(PropsPatch::new().on_click(|_, _| {})), None);
    assert!(scene.get(id).unwrap().props().handlers.on_click.is_none());

    scene.flush();
    assert!(scene.get(id).unwrap().props().handlers.on_click.is_some());
}

#[test]
fn test_props_update_keeps_children() {
    let mut scene = Scene::new();
    let child = scene.rect(Props::new(), []).unwrap();
    let root = scene.rect(Props::new(), [child]).unwrap();

    scene.request_update(root, Some(PropsPatch::from(json!({ "children": [] }))), None);
    scene.flush();

    // "children" 只是普通键，拓扑不变
    assert_eq!(scene.get(root).unwrap().children(), &[child]);
}

#[test]
fn test_unknown_target_is_skipped() {
    let (mut scene, id) = single_rect();
    let ghost = NodeId::new(500).unwrap();

    scene.request_state_change(ghost, prop_map(json!({ "a": 1 })));
    scene.request_state_change(id, prop_map(json!({ "a": 2 })));

    assert_eq!(scene.flush(), 1);
    assert!(!scene.has_pending());
    assert_eq!(scene.get(id).unwrap().state().get("a"), Some(&json!(2)));
}

#[test]
fn test_flush_on_empty_queue() {
    let (mut scene, _) = single_rect();
    assert!(!scene.has_pending());
    assert_eq!(scene.flush(), 0);
}
