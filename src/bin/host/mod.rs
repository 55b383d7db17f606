//! 宿主共用：日志、配置、示例场景

use pick_render::runtime::AppConfig;
use pick_render::scene::{prop_map, NodeId, Props, Scene};
use pick_render::SceneError;
use serde_json::json;

pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// 第一个命令行参数为配置文件路径，缺省用默认配置
pub fn load_config() -> AppConfig {
    match std::env::args().nth(1) {
        Some(path) => match AppConfig::load(&path) {
            Ok(config) => {
                log::info!("config loaded from {}", path);
                config
            }
            Err(e) => {
                log::error!("failed to load {}: {}, using defaults", path, e);
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    }
}

/// 悬停时变色的矩形
fn hover_rect(scene: &mut Scene, left: i32, top: i32, color: &'static str, hover: &'static str) -> Result<NodeId, SceneError> {
    let props = Props::from(json!({
        "left": left,
        "top": top,
        "width": 200,
        "height": 200,
        "color": color,
    }))
    .on_mouse_enter(move |ctx, _| {
        log::info!("enter {}", ctx.id());
        ctx.set_state(prop_map(json!({ "color": hover })));
    })
    .on_mouse_exit(move |ctx, _| {
        log::info!("exit {}", ctx.id());
        ctx.set_state(prop_map(json!({ "color": color })));
    })
    .on_click(|ctx, event| {
        log::info!("click {} at ({}, {})", ctx.id(), event.x, event.y);
    });

    scene.rect(props, [])
}

/// 根节点在 (20, 20)，三个 200×200 矩形加一行文本
pub fn sample_scene(scene: &mut Scene) -> Result<NodeId, SceneError> {
    let children = [
        hover_rect(scene, 0, 0, "#ffccaa", "#995533")?,
        hover_rect(scene, 220, 0, "#ccffaa", "#559933")?,
        hover_rect(scene, 0, 220, "#aaccff", "#335599")?,
        scene.text(Props::from(json!({
            "content": "I think you have a real problem",
            "font": "12px serif",
            "color": "#222266",
            "left": 240,
            "top": 320,
        })))?,
    ];

    scene.rect(Props::from(json!({ "left": 20, "top": 20 })), children)
}
