use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;

use scene::{ConfigError, GlobeConfig, RenderError, SceneContext};

mod dom;
mod frame_loop;
mod textures;
mod wgpu;
use wgpu::WgpuRenderer;

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("window missing")]
    NoWindow,
    #[error("document missing")]
    NoDocument,
    #[error("container #{0} not found")]
    MissingContainer(String),
    #[error("globe is already mounted")]
    AlreadyMounted,
    #[error("dom error: {0}")]
    Dom(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        MountError::Dom(format!("{value:?}"))
    }
}

type Context = SceneContext<WgpuRenderer>;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static CONTEXT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted scene. `None` before mount completes.
///
/// Callers must not re-enter: every DOM and animation callback borrows the
/// context for the duration of one synchronous call only.
pub(crate) fn with_context<T>(f: impl FnOnce(&mut Context) -> T) -> Option<T> {
    CONTEXT.with(|slot| match slot.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            log::warn!("scene context busy; event dropped");
            None
        }
    })
}

/// Whether a scene is installed. A busy context still counts as mounted.
pub(crate) fn scene_mounted() -> bool {
    CONTEXT.with(|slot| slot.try_borrow().map(|guard| guard.is_some()).unwrap_or(true))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    // A second init (e.g. hot reload) keeps the first logger.
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}

/// Create the canvas inside the configured container and start animating.
///
/// `config_json` is an optional partial [`GlobeConfig`] document. Mounting
/// twice is an error; a failed mount can be retried.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => GlobeConfig::from_json(json).map_err(MountError::from)?,
        _ => GlobeConfig::default(),
    };
    log::set_max_level(config.log_level().to_level_filter());

    if INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(MountError::AlreadyMounted.into());
    }

    spawn_local(async move {
        if let Err(err) = mount_inner(config).await {
            log::error!("globe mount failed: {err}");
        }
    });
    Ok(())
}

async fn mount_inner(config: GlobeConfig) -> Result<(), MountError> {
    let (canvas, width, height) = match dom::create_canvas(&config) {
        Ok(created) => created,
        Err(err) => {
            INITIALIZED.store(false, Ordering::Release);
            return Err(err);
        }
    };
    let result = attach(config, &canvas, width, height).await;
    if result.is_err() {
        // Leave the page usable without the background.
        abandon_mount();
        dom::remove_canvas(&canvas);
    }
    result
}

async fn attach(
    config: GlobeConfig,
    canvas: &HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<(), MountError> {
    let renderer = WgpuRenderer::new(canvas.clone(), width, height, &config.globe).await?;
    let assets = config.assets.clone();
    let context = SceneContext::new(config, renderer, width, height);
    CONTEXT.with(|slot| *slot.borrow_mut() = Some(context));

    dom::install_listeners(canvas)?;
    frame_loop::start()?;
    textures::load_globe_textures(&assets);
    log::info!("globe mounted ({width}x{height})");
    Ok(())
}

/// Drop the scene so leftover listeners and frame callbacks go inert, and
/// allow `mount` to be called again.
fn abandon_mount() {
    CONTEXT.with(|slot| slot.borrow_mut().take());
    INITIALIZED.store(false, Ordering::Release);
}

/// Adjust one orbit setting at runtime. Keys: `auto_rotate_speed`,
/// `damping_factor`, `rotate_speed`, `enable_rotate`, `enable_damping`,
/// `auto_rotate` (booleans take 0/1).
#[wasm_bindgen]
pub fn set_control_config(key: &str, value: f64) -> Result<(), JsValue> {
    match with_context(|ctx| ctx.apply_control_setting(key, value)) {
        Some(result) => result.map_err(|e| JsValue::from_str(&e.to_string())),
        None => Err(JsValue::from_str("globe not mounted")),
    }
}

#[wasm_bindgen]
pub fn reset_control_config() {
    with_context(|ctx| ctx.reset_controls());
}

/// Frames rendered since mount.
#[wasm_bindgen]
pub fn frame_count() -> f64 {
    with_context(|ctx| ctx.frame_count() as f64).unwrap_or(0.0)
}
