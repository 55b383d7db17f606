//! 应用主循环
//!
//! 宿主按固定节奏调用 [`App::tick`]。有待处理修改（或表面刚被调整尺寸）时
//! 先整体应用修改，再从根节点完整重绘；否则什么都不做。

use super::config::AppConfig;
use crate::canvas::Canvas;
use crate::context::DrawingContext;
use crate::error::PaintError;
use crate::event::PointerRouter;
use crate::scene::{NodeId, Scene};
use crate::surface::DualSurface;
use crate::text::TextRenderer;
use std::sync::Arc;

pub struct App<C: DrawingContext = Canvas> {
    scene: Scene,
    root: NodeId,
    surface: DualSurface<C>,
    router: PointerRouter,
    /// 尺寸调整后缓冲区内容作废，下一帧必须重绘
    surface_valid: bool,
    frames: u64,
}

impl App<Canvas> {
    /// 按配置创建软件画布；字体加载失败时文本节点不绘制
    pub fn with_config(scene: Scene, root: NodeId, config: &AppConfig) -> Self {
        let text = match &config.font_path {
            Some(path) => TextRenderer::from_file(path),
            None => TextRenderer::load_system_font(),
        };

        let mut surface = DualSurface::new(config.width, config.height);
        match text {
            Ok(text) => surface = surface.with_text_renderer(Arc::new(text)),
            Err(e) => log::warn!("text disabled: {}", e),
        }
        Self::new(scene, root, surface)
    }
}

impl<C: DrawingContext> App<C> {
    pub fn new(scene: Scene, root: NodeId, surface: DualSurface<C>) -> Self {
        Self {
            scene,
            root,
            surface,
            router: PointerRouter::new(),
            surface_valid: false,
            frames: 0,
        }
    }

    /// 首次无条件绘制
    pub fn start(&mut self) -> Result<(), PaintError> {
        log::info!("starting with {} nodes", self.scene.registry().len());
        self.render()
    }

    /// 清空并完整重绘
    pub fn render(&mut self) -> Result<(), PaintError> {
        self.surface_valid = false;
        self.surface.clear();
        self.surface.render_tree(self.scene.registry_mut(), self.root)?;
        self.surface_valid = true;
        self.frames += 1;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.scene.has_pending() || !self.surface_valid
    }

    /// 一帧：dirty 时应用修改并重绘，返回是否重绘
    pub fn tick(&mut self) -> Result<bool, PaintError> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let applied = self.scene.flush();
        if applied > 0 {
            log::debug!("applied {} updates", applied);
        }
        self.render()?;
        Ok(true)
    }

    /// 宿主窗口尺寸变化
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.surface_valid = false;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.router.pointer_move(x, y, &self.surface, &mut self.scene);
    }

    pub fn click(&mut self) {
        self.router.click(&mut self.scene);
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.router.hovered()
    }

    pub fn pick_at(&self, x: f32, y: f32) -> u32 {
        self.surface.pick_at(x, y)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn surface(&self) -> &DualSurface<C> {
        &self.surface
    }

    /// 已完成的完整绘制次数
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
