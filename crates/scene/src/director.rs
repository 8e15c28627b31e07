//! Turns reduced page state into eased targets for the globe and particles.

use foundation::color::Rgb;
use runtime::animator::Animated;

use crate::config::{GlobeConfig, InteractionConfig};
use crate::globe::Globe;
use crate::state::{reduce, PageEvent, RenderState};

/// Eased values handed to the particles and the orbit controls each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectorOutput {
    pub tint: Rgb,
    pub auto_rotate_speed: f32,
}

/// Turns page events into targets and eases toward them.
///
/// Tint and rotation speed are eased here; rotation bias and day/night mix
/// are forwarded to the [`Globe`], which owns those eases.
#[derive(Debug, Clone)]
pub struct InteractionDirector {
    config: InteractionConfig,
    state: RenderState,
    tint: Animated<Rgb>,
    rotate_speed: Animated<f32>,
}

impl InteractionDirector {
    pub fn new(config: &GlobeConfig) -> Self {
        let state = RenderState::initial(config);
        Self {
            config: config.interaction.clone(),
            state,
            tint: Animated::new(state.tint),
            rotate_speed: Animated::new(state.auto_rotate_speed),
        }
    }

    /// Current targets.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Apply one event. Returns `true` if any target changed.
    pub fn handle(&mut self, event: &PageEvent, globe: &mut Globe) -> bool {
        let next = reduce(self.state, event, &self.config);
        if next == self.state {
            return false;
        }
        let prev = std::mem::replace(&mut self.state, next);
        let ease_s = self.config.tint_ease_ms / 1000.0;

        if next.tint != prev.tint {
            self.tint.ease_to(next.tint, ease_s, self.config.easing);
        }
        if next.auto_rotate_speed != prev.auto_rotate_speed {
            self.rotate_speed
                .ease_to(next.auto_rotate_speed, ease_s, self.config.easing);
        }
        if next.hovered != prev.hovered {
            log::debug!("hovered section {:?} -> {:?}", prev.hovered, next.hovered);
        }
        if (next.pointer_yaw, next.pointer_pitch, next.scroll_mix)
            != (prev.pointer_yaw, prev.pointer_pitch, prev.scroll_mix)
        {
            globe.set_bias(next.pointer_pitch, next.pointer_yaw, next.scroll_yaw(&self.config));
        }
        if next.scroll_mix != prev.scroll_mix {
            globe.set_mix_target(next.scroll_mix);
        }
        true
    }

    pub fn advance(&mut self, dt_s: f32) -> DirectorOutput {
        DirectorOutput {
            tint: self.tint.advance(dt_s).clamped(),
            auto_rotate_speed: self.rotate_speed.advance(dt_s),
        }
    }

    pub fn output(&self) -> DirectorOutput {
        DirectorOutput {
            tint: self.tint.value().clamped(),
            auto_rotate_speed: self.rotate_speed.value(),
        }
    }

    /// Change the speed used when nothing is hovered. Takes effect at once
    /// unless a section is hovered, in which case it applies on leave.
    pub fn set_default_rotate_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        self.state.base_rotate_speed = speed;
        if self.state.hovered.is_none() {
            self.state.auto_rotate_speed = speed;
            self.rotate_speed.set(speed);
        }
    }
}
