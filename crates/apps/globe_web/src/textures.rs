use gloo_net::http::Request;
use gpu::{TextureError, decode_rgba};
use scene::AssetConfig;
use scene::globe::{TextureRole, TextureSlot};
use wasm_bindgen_futures::{JsFuture, spawn_local};

use crate::with_context;

/// Resolve on a fresh macrotask so a pending animation frame can run first.
async fn yield_now() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Fetch both globe textures in the background.
///
/// The globe renders with a flat fallback until each one lands; a failed
/// load keeps the fallback and is only logged.
///
/// Decoding is synchronous and holds the animation loop for its duration,
/// which is a visible hitch for a large map. Each decode starts on its own
/// task after the fetch, and sources above [`gpu::MAX_SOURCE_PIXELS`] are
/// refused from the header alone.
pub(crate) fn load_globe_textures(assets: &AssetConfig) {
    for (role, url) in [
        (TextureRole::Day, assets.day_texture_url.clone()),
        (TextureRole::Night, assets.night_texture_url.clone()),
    ] {
        spawn_local(async move {
            let decoded = match fetch_bytes(&url).await {
                Ok(bytes) => {
                    yield_now().await;
                    decode_for_device(&bytes)
                }
                Err(err) => Err(err),
            };
            match decoded {
                Ok(image) => {
                    log::info!(
                        "{} texture loaded: {}x{} from {url}",
                        role.label(),
                        image.width,
                        image.height
                    );
                    let slot = TextureSlot::Ready {
                        width: image.width,
                        height: image.height,
                    };
                    with_context(|ctx| {
                        ctx.renderer_mut().upload_texture(role, &image);
                        ctx.set_texture_state(role, slot);
                    });
                }
                Err(err) => {
                    log::warn!("{} texture unavailable: {err}", role.label());
                    with_context(|ctx| ctx.set_texture_state(role, TextureSlot::Failed));
                }
            }
        });
    }
}

fn decode_for_device(bytes: &[u8]) -> Result<gpu::DecodedTexture, TextureError> {
    let max_dimension = with_context(|ctx| ctx.renderer().max_texture_dimension()).unwrap_or(2048);
    decode_rgba(bytes, max_dimension)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, TextureError> {
    let fetch_err = |e: gloo_net::Error| TextureError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let resp = Request::get(url).send().await.map_err(fetch_err)?;
    if !resp.ok() {
        return Err(TextureError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    resp.binary().await.map_err(fetch_err)
}
