use crate::render::GpuRenderer;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use waves_core::{FrameLoop, PerspectiveCamera, Schedule};
use web_sys as web;

pub type SharedLoop = Rc<RefCell<FrameLoop<GpuRenderer, PerspectiveCamera>>>;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(slot: &TickSlot) {
    let (Some(w), Some(cb)) = (web::window(), slot.borrow().as_ref().map(|c| c.as_ref().clone())) else {
        return;
    };
    if let Err(e) = w.request_animation_frame(cb.unchecked_ref::<js_sys::Function>()) {
        log::error!("requestAnimationFrame failed: {:?}", e);
    }
}

/// Drive `frame_loop` from requestAnimationFrame until it stops or fails.
/// Scene resources stay alive; disposal belongs to the page lifecycle.
pub fn start_loop(frame_loop: SharedLoop) {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let outcome = frame_loop.borrow_mut().tick(Instant::now());
        match outcome {
            Ok(Schedule::Next) => request_frame(&tick_clone),
            Ok(Schedule::Stop) => log::info!("[loop] stopped"),
            Err(e) => log::error!("frame error: {:?}", e),
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
