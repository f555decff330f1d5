// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("REELFIND_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = reelfind::config::load_config();
    info!(
        "catalog={} trending={:?} token={}",
        cfg.api_base_url,
        cfg.trending_backend,
        if cfg.api_token.is_some() { "set" } else { "missing" }
    );

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "reelfind",
        options,
        Box::new(|_cc| Ok(Box::new(reelfind::app::MovieApp::new(cfg)))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try REELFIND_RENDERER=wgpu or REELFIND_RENDERER=glow.");
            Err(e)
        }
    }
}
