//! 运行时：主循环与配置

mod app;
mod config;

pub use app::App;
pub use config::AppConfig;
