use crate::audio::AnalyserSource;
use crate::dom;
use crate::frame::SharedLoop;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use waves_core::constants::U_MOUSE;
use waves_core::{
    key, wave_mappings, AmplitudeSampler, Command, CommandQueue, ControlAction, DragInput,
    SamplerConfig, WaveLayer,
};
use web_sys as web;

pub const PLAY_BUTTON_ID: &str = "ctrlPlay";
pub const CONTROLS_ID: &str = "ctrl";

/// Speed buttons post their transitions through the command queue.
pub fn wire_speed_buttons(document: &web::Document, commands: &CommandQueue) {
    for action in ControlAction::ALL {
        let commands = commands.clone();
        dom::add_click_listener(document, action.element_id(), move || {
            log::info!("[ui] {:?}", action);
            commands.extend(action.commands());
        });
    }
}

/// First click opens the track and arms the amplitude sampler.
pub fn wire_play_button(document: &web::Document, commands: &CommandQueue) {
    let started = Rc::new(Cell::new(false));
    let commands = commands.clone();
    let doc = document.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        if started.replace(true) {
            log::warn!("[ui] play already triggered; ignoring extra click");
            return;
        }
        dom::hide(&doc, CONTROLS_ID);
        let commands = commands.clone();
        spawn_local(async move {
            let source = AnalyserSource::open().await;
            if let Some(sampler) =
                AmplitudeSampler::arm(source, SamplerConfig::default(), wave_mappings())
            {
                commands.push(Command::Spawn(Box::new(sampler)));
            }
        });
    });
}

pub fn wire_resize(window: &web::Window, canvas: &web::HtmlCanvasElement, frame_loop: &SharedLoop) {
    let canvas = canvas.clone();
    let frame_loop = frame_loop.clone();
    let closure = Closure::wrap(Box::new(move || {
        let viewport = dom::sync_canvas_backing_size(&canvas);
        frame_loop.borrow_mut().resize(viewport);
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Release GPU resources when the page goes away.
pub fn wire_unload(window: &web::Window, frame_loop: &SharedLoop) {
    let frame_loop = frame_loop.clone();
    let closure = Closure::wrap(Box::new(move || {
        let mut l = frame_loop.borrow_mut();
        l.stop();
        l.scene_mut().dispose();
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
fn pointer_canvas_uv(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w > 0.0 && h > 0.0 {
        Vec2::new((x_css / w).clamp(0.0, 1.0), (y_css / h).clamp(0.0, 1.0))
    } else {
        Vec2::splat(0.5)
    }
}

fn add_pointer_listener(
    canvas: &web::HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(web::PointerEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
    let _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Drag to orbit the camera; pointer position feeds every layer's `u_mouse`.
pub fn wire_pointer(canvas: &web::HtmlCanvasElement, drags: &DragInput, commands: &CommandQueue) {
    let last: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));

    {
        let last = last.clone();
        let canvas_c = canvas.clone();
        add_pointer_listener(canvas, "pointerdown", move |ev| {
            let _ = canvas_c.set_pointer_capture(ev.pointer_id());
            last.set(Some(Vec2::new(ev.client_x() as f32, ev.client_y() as f32)));
        });
    }
    {
        let last = last.clone();
        let canvas_c = canvas.clone();
        let drags = drags.clone();
        let commands = commands.clone();
        add_pointer_listener(canvas, "pointermove", move |ev| {
            let uv = pointer_canvas_uv(&ev, &canvas_c);
            for layer in WaveLayer::ALL {
                commands.push(Command::set(key(layer, U_MOUSE), uv));
            }
            if let Some(prev) = last.get() {
                let now = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
                let d = now - prev;
                drags.push(d.x, d.y);
                last.set(Some(now));
            }
        });
    }
    for event in ["pointerup", "pointercancel"] {
        let last = last.clone();
        add_pointer_listener(canvas, event, move |_ev| last.set(None));
    }
}
