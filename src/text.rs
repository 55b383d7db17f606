//! 文本渲染模块 - fontdue 字形光栅化

use crate::error::Error;
use crate::{Canvas, Color};
use fontdue::{Font, FontSettings, Metrics};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// 系统字体候选路径，`PICK_RENDER_FONT` 环境变量优先
static SYSTEM_FONT_PATHS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    let mut paths = Vec::new();
    if let Ok(path) = std::env::var("PICK_RENDER_FONT") {
        paths.push(PathBuf::from(path));
    }
    paths.extend(
        [
            "/System/Library/Fonts/Helvetica.ttc",
            "/System/Library/Fonts/PingFang.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "C:\\Windows\\Fonts\\times.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
        .iter()
        .map(PathBuf::from),
    );
    paths
});

/// CSS 风格的字体描述，例如 `"12px serif"`
///
/// 只有字号参与绘制。`family` 仅作记录：所有文本都用 [`TextRenderer`]
/// 加载的那一个字体。
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { size: DEFAULT_FONT_SIZE, family: "sans-serif".to_string() }
    }
}

impl FontSpec {
    /// 取第一个 `<N>px` 作为字号，其后的部分作为字体族。无法识别时用默认值。
    pub fn parse(value: &str) -> Self {
        let mut font = FontSpec::default();
        let mut tokens = value.split_whitespace();

        while let Some(token) = tokens.next() {
            let Some(size) = token.strip_suffix("px").and_then(|s| s.parse::<f32>().ok()) else {
                continue;
            };
            if size > 0.0 && size.is_finite() {
                font.size = size;
            }
            let family = tokens.by_ref().collect::<Vec<_>>().join(" ");
            if !family.is_empty() {
                font.family = family;
            }
            break;
        }
        font
    }
}

/// 文本渲染器
pub struct TextRenderer {
    font: Font,
    /// (char, size*10) -> (Metrics, Bitmap)
    cache: Mutex<HashMap<(char, u32), (Metrics, Vec<u8>)>>,
}

impl TextRenderer {
    /// 从字体数据创建
    pub fn from_bytes(font_data: &[u8]) -> Result<Self, Error> {
        let settings = FontSettings {
            scale: 40.0,
            ..Default::default()
        };
        let font = Font::from_bytes(font_data, settings)
            .map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self {
            font,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// 从文件路径加载字体
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let font_data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("Failed to read font file {}: {}", path.display(), e)))?;
        Self::from_bytes(&font_data)
    }

    /// 依次尝试系统字体
    pub fn load_system_font() -> Result<Self, Error> {
        for path in SYSTEM_FONT_PATHS.iter().filter(|p| p.exists()) {
            match Self::from_file(path) {
                Ok(renderer) => {
                    log::info!("Loaded font {}", path.display());
                    return Ok(renderer);
                }
                Err(e) => log::debug!("Skipping font {}: {}", path.display(), e),
            }
        }
        Err(Error::Font("No system font found".to_string()))
    }

    fn glyph(&self, ch: char, size: f32) -> (Metrics, Vec<u8>) {
        let key = (ch, (size * 10.0) as u32);
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        // 光栅化放在锁外
        let glyph = self.font.rasterize(ch, size);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, glyph.clone());
        }
        glyph
    }

    /// 逐字形回调：(左上角设备坐标, 度量, 覆盖率位图)
    fn for_each_glyph(&self, text: &str, x: f32, y: f32, size: f32, mut f: impl FnMut(i32, i32, &Metrics, &[u8])) {
        let mut cursor_x = x;
        for ch in text.chars() {
            let (metrics, bitmap) = self.glyph(ch, size);
            if metrics.width > 0 && metrics.height > 0 {
                let glyph_x = (cursor_x + metrics.xmin as f32).round() as i32;
                let glyph_y = (y - metrics.height as f32 - metrics.ymin as f32).round() as i32;
                f(glyph_x, glyph_y, &metrics, &bitmap);
            }
            cursor_x += metrics.advance_width;
        }
    }

    /// 填充文本；`x`/`y` 为设备坐标，`y` 为基线
    pub fn fill_text(&self, canvas: &mut Canvas, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.for_each_glyph(text, x, y, size, |gx0, gy0, metrics, bitmap| {
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx] as f32 / 255.0;
                    if coverage > 0.001 {
                        canvas.set_pixel_aa(gx0 + gx as i32, gy0 + gy as i32, color, coverage);
                    }
                }
            }
        });
    }

    /// 描边文本：字形墨迹边界两侧各一像素
    pub fn stroke_text(&self, canvas: &mut Canvas, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.for_each_glyph(text, x, y, size, |gx0, gy0, metrics, bitmap| {
            let (w, h) = (metrics.width as i32, metrics.height as i32);
            let ink = |gx: i32, gy: i32| -> bool {
                gx >= 0 && gy >= 0 && gx < w && gy < h && bitmap[(gy * w + gx) as usize] >= 128
            };

            for gy in -1..=h {
                for gx in -1..=w {
                    let here = ink(gx, gy);
                    let edge = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                        .iter()
                        .any(|(dx, dy)| ink(gx + dx, gy + dy) != here);
                    if edge {
                        canvas.set_pixel_aa(gx0 + gx, gy0 + gy, color, 1.0);
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}
