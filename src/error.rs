//! 错误类型

use crate::scene::NodeId;
use thiserror::Error;

/// 场景树构建错误
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {child} already has parent {parent}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("node {0} listed more than once as a child")]
    DuplicateChild(NodeId),

    #[error("id space exhausted: at most {max} nodes fit in the pick buffer")]
    IdSpaceExhausted { max: u32 },
}

/// 绘制错误
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("node {node}: invalid color {value} for `{key}`")]
    InvalidColor {
        node: NodeId,
        key: &'static str,
        value: String,
    },

    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 顶层错误
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Paint(#[from] PaintError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Font error: {0}")]
    Font(String),
}

pub type Result<T> = std::result::Result<T, Error>;
