use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::{MountError, dom, scene_mounted, with_context};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &FrameCallback) -> Result<(), MountError> {
    let window = dom::window()?;
    let slot = callback.borrow();
    let closure = slot
        .as_ref()
        .ok_or_else(|| MountError::Dom("frame callback dropped".into()))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}

/// Drive `SceneContext::tick` from `requestAnimationFrame` until the scene is dropped.
pub(crate) fn start() -> Result<(), MountError> {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        if !scene_mounted() {
            log::debug!("scene gone; animation loop stopped");
            return;
        }
        with_context(|ctx| ctx.tick(timestamp_ms));
        if let Err(err) = request_frame(&f) {
            log::error!("animation stopped: {err}");
        }
    }) as Box<dyn FnMut(f64)>));

    request_frame(&g)
}
