#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use datagrid_ui::{DataGridApp, state::State};

fn create_app(
    _cc: &eframe::CreationContext<'_>,
) -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Box::new(DataGridApp::new(State::default())))
}

#[cfg(not(target_arch = "wasm32"))]
mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    // `RUST_LOG` controls the level; clipboard format errors from egui_winit are muted.
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native("Data Grid", native_options, Box::new(create_app))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast as _;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            log::error!("no document to mount the app in");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("egui_canvas")
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("egui_canvas is missing or not a canvas");
            return;
        };

        let started = eframe::WebRunner::new()
            .start(canvas, web_options, Box::new(create_app))
            .await;

        let loading = document.get_element_by_id("loading_text");
        match (started, loading) {
            (Ok(()), Some(loading)) => loading.remove(),
            (Ok(()), None) => {}
            (Err(err), loading) => {
                log::error!("data grid failed to start: {err:?}");
                if let Some(loading) = loading {
                    loading.set_inner_html("<p>Data grid failed to start, see the console.</p>");
                }
            }
        }
    });
}
