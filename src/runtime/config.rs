//! 应用配置

use crate::error::ConfigError;
use crate::Color;
use serde::Deserialize;
use std::path::Path;

/// JSON 配置，例如
///
/// ```json
/// { "title": "Pick Demo", "width": 640, "height": 480, "background": "#ffffff" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_resizable")]
    pub resizable: bool,
    /// 未设置时尝试系统字体
    #[serde(default)]
    pub font_path: Option<String>,
    /// 帧间隔（毫秒）
    #[serde(default = "default_frame_interval")]
    pub frame_interval: u64,
}

fn default_title() -> String { "Pick Render".to_string() }
fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }
fn default_background() -> String { "#ffffff".to_string() }
fn default_resizable() -> bool { true }
fn default_frame_interval() -> u64 { 16 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
            resizable: default_resizable(),
            font_path: None,
            frame_interval: default_frame_interval(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// 背景色；无法解析时为白色
    pub fn background_color(&self) -> Color {
        Color::parse(&self.background).unwrap_or_else(|| {
            log::warn!("invalid background {:?}, using white", self.background);
            Color::WHITE
        })
    }
}
