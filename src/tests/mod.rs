//! 单元测试模块
//! 覆盖 id 编码、延迟更新、双缓冲绘制、指针路由、主循环与配置

pub mod update_tests;
pub mod pointer_tests;
pub mod config_tests;

use crate::scene::Props;
use serde_json::json;

/// 辅助函数：矩形属性
pub(crate) fn rect_props(left: i32, top: i32, width: i32, height: i32, color: &str) -> Props {
    Props::from(json!({
        "left": left,
        "top": top,
        "width": width,
        "height": height,
        "color": color,
    }))
}

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
