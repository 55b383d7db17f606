//! 无窗口运行：绘制示例场景、模拟指针移动并输出 PNG

mod host;

use pick_render::runtime::App;
use pick_render::scene::Scene;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    host::init_logging();
    println!("🚀 Pick Render (headless)");

    let config = host::load_config();
    let mut scene = Scene::new();
    let root = host::sample_scene(&mut scene)?;

    let mut app = App::with_config(scene, root, &config);
    app.start()?;
    app.surface().visible().save_png("pick_visible.png")?;
    app.surface().pick().save_png("pick_ids.png")?;
    println!("✅ Rendered to pick_visible.png / pick_ids.png");

    // 移入第一个矩形
    app.pointer_move(120.0, 120.0);
    app.tick()?;
    println!(
        "   hover {:?}, color {:?}",
        app.hovered(),
        app.surface().visible_at(120.0, 120.0)
    );
    app.surface().visible().save_png("pick_hover.png")?;

    app.click();

    // 移出
    app.pointer_move(630.0, 470.0);
    app.tick()?;
    println!(
        "   hover {:?}, color {:?}",
        app.hovered(),
        app.surface().visible_at(120.0, 120.0)
    );

    println!("👋 {} frames rendered", app.frames());
    Ok(())
}
