//! Canvas 画布模块 - 软件光栅实现的绘图上下文

use crate::context::DrawingContext;
use crate::error::Error;
use crate::text::{FontSpec, TextRenderer};
use crate::{Color, Paint, PaintStyle, Rect, Size};
use std::sync::Arc;

/// 光栅写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// 普通绘制：alpha 混合、抗锯齿
    #[default]
    Blended,
    /// 拾取缓冲区：像素直接覆盖且不透明，覆盖率按 50% 取舍。
    /// 任何混合都会让解码出的 id 错乱。
    Exact,
}

/// 单边最大像素数
pub const MAX_CANVAS_SIDE: u32 = 16_384;
/// 最大像素总数（约 64 MB 的 RGBA）
pub const MAX_CANVAS_PIXELS: usize = 1 << 24;

/// 把宿主给出的尺寸限制在可分配范围内
fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    let width = width.min(MAX_CANVAS_SIDE);
    let mut height = height.min(MAX_CANVAS_SIDE);
    if width > 0 && width as usize * height as usize > MAX_CANVAS_PIXELS {
        height = (MAX_CANVAS_PIXELS / width as usize) as u32;
    }
    (width, height)
}

/// 画布状态
#[derive(Clone)]
struct CanvasState {
    translation: (f32, f32),
    fill: Paint,
    stroke: Paint,
    font: FontSpec,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            translation: (0.0, 0.0),
            fill: Paint::new(),
            stroke: Paint::new().with_style(PaintStyle::Stroke),
            font: FontSpec::default(),
        }
    }
}

/// 画布 - 主要渲染接口
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    mode: RasterMode,
    current: CanvasState,
    state_stack: Vec<CanvasState>,
    text: Option<Arc<TextRenderer>>,
}

impl Canvas {
    /// 超出 [`MAX_CANVAS_SIDE`] / [`MAX_CANVAS_PIXELS`] 的尺寸会被截小
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
            mode: RasterMode::Blended,
            current: CanvasState::default(),
            state_stack: Vec::new(),
            text: None,
        }
    }

    pub fn with_mode(mut self, mode: RasterMode) -> Self {
        self.mode = mode;
        self
    }

    /// 挂载字体；未挂载时文本绘制为空操作
    pub fn set_text_renderer(&mut self, text: Option<Arc<TextRenderer>>) {
        self.text = text;
    }

    pub fn mode(&self) -> RasterMode { self.mode }
    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// 当前保存栈深度
    pub fn save_depth(&self) -> usize {
        self.state_stack.len()
    }

    pub fn translation(&self) -> (f32, f32) {
        self.current.translation
    }

    /// 获取像素数据引用
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// 清空画布
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// 获取像素
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            Color::TRANSPARENT
        }
    }

    /// 设置像素；Exact 模式下直接覆盖
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = y as usize * self.width as usize + x as usize;
        match self.mode {
            RasterMode::Exact => {
                if color.a > 0 {
                    self.pixels[idx] = Color::rgb(color.r, color.g, color.b);
                }
            }
            RasterMode::Blended => {
                if color.a == 255 {
                    self.pixels[idx] = color;
                } else if color.a > 0 {
                    self.pixels[idx] = color.blend(&self.pixels[idx]);
                }
            }
        }
    }

    /// 设置像素（带抗锯齿 coverage）
    pub(crate) fn set_pixel_aa(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if coverage <= 0.0 { return; }
        match self.mode {
            RasterMode::Exact => {
                if coverage >= 0.5 {
                    self.set_pixel(x, y, color);
                }
            }
            RasterMode::Blended => {
                let a = (color.a as f32 * coverage.min(1.0)) as u8;
                self.set_pixel(x, y, Color::new(color.r, color.g, color.b, a));
            }
        }
    }

    /// 绘制矩形（局部坐标）
    pub fn draw_rect(&mut self, rect: &Rect, paint: &Paint) {
        match paint.style {
            PaintStyle::Fill => self.fill_device_rect(rect, paint.color),
            PaintStyle::Stroke => self.stroke_device_rect(rect, paint),
        }
    }

    fn to_device(&self, rect: &Rect) -> Rect {
        let (tx, ty) = self.current.translation;
        let rect = rect.offset(tx, ty);
        // 负宽高按 canvas 语义归一化
        let (x, width) = if rect.width < 0.0 { (rect.x + rect.width, -rect.width) } else { (rect.x, rect.width) };
        let (y, height) = if rect.height < 0.0 { (rect.y + rect.height, -rect.height) } else { (rect.y, rect.height) };
        Rect::new(x, y, width, height)
    }

    fn fill_span(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.width as i32);
        let y1 = y1.min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn fill_device_rect(&mut self, rect: &Rect, color: Color) {
        let rect = self.to_device(rect);
        self.fill_span(
            rect.x.round() as i32,
            rect.y.round() as i32,
            rect.right().round() as i32,
            rect.bottom().round() as i32,
            color,
        );
    }

    /// 描边跨在边线两侧，四条边互不重叠，避免半透明色重复混合
    fn stroke_device_rect(&mut self, rect: &Rect, paint: &Paint) {
        let rect = self.to_device(rect);
        let half = paint.stroke_width / 2.0;
        let n = paint.stroke_width.round().max(1.0) as i32;

        let left = (rect.x - half).floor() as i32;
        let top = (rect.y - half).floor() as i32;
        let right = (rect.right() + half).ceil() as i32;
        let bottom = (rect.bottom() + half).ceil() as i32;
        let color = paint.color;

        // 上边
        self.fill_span(left, top, right, (top + n).min(bottom), color);
        // 下边
        self.fill_span(left, (bottom - n).max(top + n), right, bottom, color);
        // 左边
        self.fill_span(left, top + n, (left + n).min(right), bottom - n, color);
        // 右边
        self.fill_span((right - n).max(left + n), top + n, right, bottom - n, color);
    }

    /// 绘制文本；`x`/`y` 为局部坐标，`y` 为基线
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) {
        let Some(renderer) = self.text.clone() else {
            log::trace!("no font attached, skipping text {:?}", text);
            return;
        };
        let (tx, ty) = self.current.translation;
        let size = self.current.font.size;
        match paint.style {
            PaintStyle::Fill => renderer.fill_text(self, text, x + tx, y + ty, size, paint.color),
            PaintStyle::Stroke => renderer.stroke_text(self, text, x + tx, y + ty, size, paint.color),
        }
    }

    /// 导出为 RGBA 字节数组
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            data.push(pixel.r);
            data.push(pixel.g);
            data.push(pixel.b);
            data.push(pixel.a);
        }
        data
    }

    /// 保存为 PNG
    pub fn save_png(&self, path: &str) -> Result<(), Error> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(
            self.width,
            self.height,
            self.to_rgba()
        ).ok_or_else(|| Error::Image("Failed to create image buffer".to_string()))?;

        img.save(path).map_err(|e| Error::Image(e.to_string()))
    }
}

impl DrawingContext for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (clamped_w, clamped_h) = clamp_size(width, height);
        if (clamped_w, clamped_h) != (width, height) {
            log::warn!("canvas {}x{} clamped to {}x{}", width, height, clamped_w, clamped_h);
        }
        self.width = clamped_w;
        self.height = clamped_h;
        self.pixels = vec![Color::TRANSPARENT; clamped_w as usize * clamped_h as usize];
        self.current = CanvasState::default();
        self.state_stack.clear();
    }

    fn save(&mut self) {
        self.state_stack.push(self.current.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.current.translation.0 += dx;
        self.current.translation.1 += dy;
    }

    fn set_fill_style(&mut self, color: Color) {
        self.current.fill.color = color;
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.current.stroke.color = color;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.current.font = font.clone();
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = self.to_device(&Rect::new(x, y, width, height));
        let x0 = (rect.x.round() as i32).max(0);
        let y0 = (rect.y.round() as i32).max(0);
        let x1 = (rect.right().round() as i32).min(self.width as i32);
        let y1 = (rect.bottom().round() as i32).min(self.height as i32);

        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            for x in x0..x1 {
                self.pixels[row + x as usize] = Color::TRANSPARENT;
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let paint = self.current.fill.clone();
        self.draw_rect(&Rect::new(x, y, width, height), &paint);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let paint = self.current.stroke.clone();
        self.draw_rect(&Rect::new(x, y, width, height), &paint);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let paint = self.current.fill.clone();
        self.draw_text(text, x, y, &paint);
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        let paint = self.current.stroke.clone();
        self.draw_text(text, x, y, &paint);
    }

    fn read_pixel(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 {
            return Color::TRANSPARENT;
        }
        self.get_pixel(x as u32, y as u32)
    }
}
