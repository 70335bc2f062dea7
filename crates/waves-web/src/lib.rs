#![cfg(target_arch = "wasm32")]
mod audio;
mod dom;
mod events;
mod frame;
mod render;

use render::{BloomComposer, BloomParams, GpuRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use waves_core::{
    wave_uniforms, CameraParams, DragInput, FrameLoop, PerspectiveCamera, SceneContext, SceneHook,
};

const CONTAINER_ID: &str = "webGl-container";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("noise-waves starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CONTAINER_ID))?;

    let canvas = dom::mount_canvas(&document, &container)?;
    let viewport = dom::sync_canvas_backing_size(&canvas);

    let renderer = GpuRenderer::new(&canvas).await?;
    let composer = BloomComposer::new(&renderer, BloomParams::default());
    let camera = PerspectiveCamera::from_params(CameraParams::default(), viewport.aspect());
    let drags = DragInput::default();
    let hook = SceneHook::new(&camera, drags.clone());

    let mut scene = SceneContext::new(renderer, camera).with_composer(Box::new(composer));
    scene.init(viewport);
    let uniforms = wave_uniforms(viewport)?;
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new(scene, uniforms).with_hook(hook)));

    let commands = frame_loop.borrow().commands();
    events::wire_speed_buttons(&document, &commands);
    events::wire_play_button(&document, &commands);
    events::wire_pointer(&canvas, &drags, &commands);
    events::wire_resize(&window, &canvas, &frame_loop);
    events::wire_unload(&window, &frame_loop);

    log::info!(
        "[init] {}x{} @{}",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );
    frame::start_loop(frame_loop);
    Ok(())
}
