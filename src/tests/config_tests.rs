//! 配置、颜色与字体描述解析测试

use crate::runtime::AppConfig;
use crate::text::FontSpec;
use crate::{Color, ConfigError};

#[test]
fn test_empty_config_uses_defaults() {
    let config = AppConfig::from_json("{}").unwrap();

    assert_eq!(config.title, "Pick Render");
    assert_eq!((config.width, config.height), (640, 480));
    assert_eq!(config.background_color(), Color::WHITE);
    assert!(config.resizable);
    assert!(config.font_path.is_none());
    assert_eq!(config.frame_interval, 16);
}

#[test]
fn test_camel_case_overrides() {
    let config = AppConfig::from_json(
        r##"{
            "title": "Demo",
            "width": 800,
            "background": "#102030",
            "fontPath": "/tmp/font.ttf",
            "frameInterval": 33
        }"##,
    )
    .unwrap();

    assert_eq!(config.title, "Demo");
    assert_eq!(config.width, 800);
    assert_eq!(config.height, 480);
    assert_eq!(config.background_color(), Color::rgb(0x10, 0x20, 0x30));
    assert_eq!(config.font_path.as_deref(), Some("/tmp/font.ttf"));
    assert_eq!(config.frame_interval, 33);
}

#[test]
fn test_invalid_background_falls_back_to_white() {
    let config = AppConfig::from_json(r#"{ "background": "tomato" }"#).unwrap();
    assert_eq!(config.background_color(), Color::WHITE);
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(AppConfig::from_json("{ width: 1"), Err(ConfigError::Parse(_))));
    assert!(matches!(AppConfig::from_json(r#"{ "width": "wide" }"#), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("pick-render-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "height": 200 }"#).unwrap();

    let config = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.height, 200);

    assert!(matches!(AppConfig::load(&path), Err(ConfigError::Io(_))));
}

#[test]
fn test_color_parse_and_css() {
    assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
    assert_eq!(Color::parse(" #FFCCAA "), Some(Color::rgb(0xff, 0xcc, 0xaa)));
    assert_eq!(Color::parse("#12345"), None);
    assert_eq!(Color::parse("ffccaa"), None);
    assert_eq!(Color::parse("#ggg"), None);

    assert_eq!(Color::from_hex(0x0a0b0c).to_css(), "#0a0b0c");
    assert_eq!(Color::parse(&Color::from_hex(0xabcdef).to_css()), Some(Color::from_hex(0xabcdef)));
}

#[test]
fn test_font_spec_parse() {
    let font = FontSpec::parse("12px serif");
    assert_eq!(font.size, 12.0);
    assert_eq!(font.family, "serif");

    let font = FontSpec::parse("bold 20.5px Noto Sans");
    assert_eq!(font.size, 20.5);
    assert_eq!(font.family, "Noto Sans");

    let font = FontSpec::parse("italic");
    assert_eq!(font.size, 16.0);
    assert_eq!(font.family, "sans-serif");
}
