use glam::Vec2;
use scene::camera::{ControlInput, MouseButton, PointerKind};
use scene::{GlobeConfig, PageEvent, Section};
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, EventTarget, HtmlCanvasElement, MouseEvent, PointerEvent,
    WheelEvent, Window,
};

use crate::{MountError, with_context};

pub(crate) fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::NoWindow)
}

fn document() -> Result<Document, MountError> {
    window()?.document().ok_or(MountError::NoDocument)
}

/// Backing-store size for a CSS box, with the device pixel ratio capped.
pub(crate) fn backing_size(css_width: f64, css_height: f64, dpr: f64, max_ratio: f64) -> (u32, u32) {
    let ratio = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let ratio = ratio.min(max_ratio.max(1.0));
    let side = |css: f64| {
        let px = if css.is_finite() { css * ratio } else { 0.0 };
        px.round().max(1.0) as u32
    };
    (side(css_width), side(css_height))
}

/// Canvas-local CSS pixels to backing-store pixels.
pub(crate) fn to_backing(offset_x: f64, offset_y: f64, scale: f64) -> Vec2 {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    Vec2::new((offset_x * scale) as f32, (offset_y * scale) as f32)
}

fn canvas_size(canvas: &HtmlCanvasElement, max_ratio: f64) -> Result<(u32, u32), MountError> {
    let window = window()?;
    backing_size_for(canvas, &window, max_ratio)
}

fn backing_size_for(
    canvas: &HtmlCanvasElement,
    window: &Window,
    max_ratio: f64,
) -> Result<(u32, u32), MountError> {
    // A container that has not been laid out yet falls back to the viewport.
    let (mut w, mut h) = (canvas.client_width() as f64, canvas.client_height() as f64);
    if w <= 0.0 || h <= 0.0 {
        w = window.inner_width()?.as_f64().unwrap_or(1.0);
        h = window.inner_height()?.as_f64().unwrap_or(1.0);
    }
    Ok(backing_size(w, h, window.device_pixel_ratio(), max_ratio))
}

pub(crate) fn create_canvas(config: &GlobeConfig) -> Result<(HtmlCanvasElement, u32, u32), MountError> {
    let document = document()?;
    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or_else(|| MountError::MissingContainer(config.container_id.clone()))?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::Dom("created element is not a canvas".into()))?;
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("touch-action", "none")?;
    container.append_child(&canvas)?;

    let (width, height) = canvas_size(&canvas, config.camera.max_pixel_ratio)?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok((canvas, width, height))
}

pub(crate) fn remove_canvas(canvas: &HtmlCanvasElement) {
    canvas.remove();
}

fn listen<E>(
    target: &EventTarget,
    name: &str,
    passive: bool,
    handler: impl FnMut(E) + 'static,
) -> Result<(), MountError>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::wrap(Box::new(handler));
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

pub(crate) fn install_listeners(canvas: &HtmlCanvasElement) -> Result<(), MountError> {
    let window = window()?;
    let document = document()?;
    install_page_listeners(&window, &document)?;
    install_resize_listener(&window, canvas)?;
    install_section_listeners(&document)?;
    install_control_listeners(canvas)?;
    Ok(())
}

fn install_page_listeners(window: &Window, document: &Document) -> Result<(), MountError> {
    {
        let w = window.clone();
        listen(window, "pointermove", true, move |ev: PointerEvent| {
            let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            with_context(|ctx| {
                ctx.handle_event(&PageEvent::PointerMove {
                    x: ev.client_x() as f64,
                    y: ev.client_y() as f64,
                    viewport_width: width,
                    viewport_height: height,
                })
            });
        })?;
    }

    let w = window.clone();
    let doc = document.clone();
    listen(window, "scroll", true, move |_: web_sys::Event| {
        let scroll_y = w.scroll_y().unwrap_or(0.0);
        let viewport_height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let document_height = doc
            .document_element()
            .map(|el| el.scroll_height() as f64)
            .unwrap_or(0.0);
        with_context(|ctx| {
            ctx.handle_event(&PageEvent::Scroll {
                scroll_y,
                document_height,
                viewport_height,
            })
        });
    })
}

fn install_resize_listener(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), MountError> {
    let w = window.clone();
    let canvas = canvas.clone();
    listen(window, "resize", true, move |_: web_sys::Event| {
        if !canvas.is_connected() {
            return;
        }
        let Some(max_ratio) = with_context(|ctx| ctx.config().camera.max_pixel_ratio) else {
            return;
        };
        match backing_size_for(&canvas, &w, max_ratio) {
            Ok((width, height)) => {
                canvas.set_width(width);
                canvas.set_height(height);
                with_context(|ctx| ctx.resize(width, height));
            }
            Err(err) => log::warn!("resize skipped: {err}"),
        }
    })
}

fn install_section_listeners(document: &Document) -> Result<(), MountError> {
    for section in Section::ALL {
        let Some(element) = document.get_element_by_id(section.id()) else {
            log::debug!("section #{} not on page; hover tint disabled for it", section.id());
            continue;
        };
        listen(&element, "mouseenter", true, move |_: MouseEvent| {
            with_context(|ctx| ctx.handle_event(&PageEvent::SectionEnter(section)));
        })?;
        listen(&element, "mouseleave", true, move |_: MouseEvent| {
            with_context(|ctx| ctx.handle_event(&PageEvent::SectionLeave(section)));
        })?;
    }
    Ok(())
}

fn install_control_listeners(canvas: &HtmlCanvasElement) -> Result<(), MountError> {
    let scale_of = |c: &HtmlCanvasElement| c.height() as f64 / c.client_height().max(1) as f64;

    {
        let c = canvas.clone();
        listen(canvas, "pointerdown", false, move |ev: PointerEvent| {
            let input = ControlInput::PointerDown {
                pointer_id: ev.pointer_id(),
                kind: PointerKind::from_dom(&ev.pointer_type()),
                button: MouseButton::from_dom(ev.button()),
                position: to_backing(ev.offset_x() as f64, ev.offset_y() as f64, scale_of(&c)),
            };
            if with_context(|ctx| ctx.handle_control_input(&input)).unwrap_or(false) {
                ev.prevent_default();
                if let Err(err) = c.set_pointer_capture(ev.pointer_id()) {
                    log::debug!("pointer capture failed: {err:?}");
                }
            }
        })?;
    }
    {
        let c = canvas.clone();
        listen(canvas, "pointermove", true, move |ev: PointerEvent| {
            let input = ControlInput::PointerMove {
                pointer_id: ev.pointer_id(),
                position: to_backing(ev.offset_x() as f64, ev.offset_y() as f64, scale_of(&c)),
            };
            with_context(|ctx| ctx.handle_control_input(&input));
        })?;
    }
    for name in ["pointerup", "pointercancel"] {
        listen(canvas, name, true, move |ev: PointerEvent| {
            let input = ControlInput::PointerUp {
                pointer_id: ev.pointer_id(),
            };
            with_context(|ctx| ctx.handle_control_input(&input));
        })?;
    }
    listen(canvas, "wheel", false, move |ev: WheelEvent| {
        let input = ControlInput::Wheel {
            delta_y: ev.delta_y() as f32,
        };
        if with_context(|ctx| ctx.handle_control_input(&input)).unwrap_or(false) {
            ev.prevent_default();
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{backing_size, to_backing};
    use glam::Vec2;

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(backing_size(800.0, 600.0, 1.0, 2.0), (800, 600));
        assert_eq!(backing_size(800.0, 600.0, 3.0, 2.0), (1600, 1200));
        assert_eq!(backing_size(800.0, 600.0, f64::NAN, 2.0), (800, 600));
        assert_eq!(backing_size(0.0, 600.0, 2.0, 2.0), (1, 1200));
    }

    #[test]
    fn offsets_scale_to_backing_pixels() {
        assert_eq!(to_backing(10.0, 20.0, 2.0), Vec2::new(20.0, 40.0));
        assert_eq!(to_backing(10.0, 20.0, 0.0), Vec2::new(10.0, 20.0));
    }
}
