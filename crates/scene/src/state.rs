//! Target values derived from page events.
//!
//! [`reduce`] is a pure function from the previous targets and one event to
//! the next targets. It never touches eased values; the director turns target
//! changes into eases.

use foundation::color::Rgb;
use foundation::math::{checked_ratio, finite_or, sanitize_unit};

use crate::config::{GlobeConfig, InteractionConfig};
use crate::sections::Section;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub pointer_yaw: f32,
    pub pointer_pitch: f32,
    /// Scroll depth in `[0, 1]`.
    pub scroll_mix: f32,
    pub tint: Rgb,
    pub auto_rotate_speed: f32,
    /// Speed restored when no section is hovered.
    pub base_rotate_speed: f32,
    pub hovered: Option<Section>,
}

impl RenderState {
    pub fn initial(config: &GlobeConfig) -> Self {
        Self {
            pointer_yaw: 0.0,
            pointer_pitch: 0.0,
            scroll_mix: 0.0,
            tint: config.interaction.tints.default.clamped(),
            auto_rotate_speed: config.orbit.auto_rotate_speed,
            base_rotate_speed: config.orbit.auto_rotate_speed,
            hovered: None,
        }
    }

    /// Yaw bias contributed by scroll depth.
    pub fn scroll_yaw(&self, config: &InteractionConfig) -> f32 {
        self.scroll_mix * config.scroll_yaw
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    PointerMove {
        x: f64,
        y: f64,
        viewport_width: f64,
        viewport_height: f64,
    },
    Scroll {
        scroll_y: f64,
        document_height: f64,
        viewport_height: f64,
    },
    SectionEnter(Section),
    SectionLeave(Section),
}

/// `scroll_y / (document_height - viewport_height)` clamped to `[0, 1]`.
///
/// A page that does not scroll (or reports garbage) yields 0.
pub fn scroll_fraction(scroll_y: f64, document_height: f64, viewport_height: f64) -> f32 {
    checked_ratio(scroll_y, document_height - viewport_height)
        .map(|r| sanitize_unit(r as f32))
        .unwrap_or(0.0)
}

/// Pointer offset from the viewport center, scaled. Returns `(yaw, pitch)`.
pub fn pointer_offset(x: f64, y: f64, width: f64, height: f64, scale: f32) -> (f32, f32) {
    let dx = finite_or((x - width * 0.5) as f32, 0.0);
    let dy = finite_or((y - height * 0.5) as f32, 0.0);
    (dx * scale, dy * scale)
}

pub fn reduce(state: RenderState, event: &PageEvent, config: &InteractionConfig) -> RenderState {
    let mut next = state;
    match *event {
        PageEvent::PointerMove {
            x,
            y,
            viewport_width,
            viewport_height,
        } => {
            let (yaw, pitch) =
                pointer_offset(x, y, viewport_width, viewport_height, config.pointer_scale);
            next.pointer_yaw = yaw;
            next.pointer_pitch = pitch;
        }
        PageEvent::Scroll {
            scroll_y,
            document_height,
            viewport_height,
        } => {
            next.scroll_mix = scroll_fraction(scroll_y, document_height, viewport_height);
        }
        PageEvent::SectionEnter(section) => {
            next.hovered = Some(section);
            next.tint = config.tints.for_section(section).clamped();
            next.auto_rotate_speed = config.hover_rotate_speed;
        }
        PageEvent::SectionLeave(section) => {
            if state.hovered == Some(section) {
                next.hovered = None;
                next.tint = config.tints.default.clamped();
                next.auto_rotate_speed = state.base_rotate_speed;
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::{pointer_offset, reduce, scroll_fraction, PageEvent, RenderState};
    use crate::config::GlobeConfig;
    use crate::sections::Section;
    use pretty_assertions::assert_eq;

    #[test]
    fn scroll_fraction_is_guarded_and_clamped() {
        assert_eq!(scroll_fraction(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(scroll_fraction(2000.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_fraction(5000.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_fraction(-10.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(100.0, 800.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(100.0, 1000.0, 1000.0), 0.0);
        assert_eq!(scroll_fraction(f64::NAN, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn pointer_offset_is_linear_through_center() {
        let (yaw, pitch) = pointer_offset(500.0, 400.0, 1000.0, 800.0, 0.001);
        assert_eq!((yaw, pitch), (0.0, 0.0));
        let (l, _) = pointer_offset(499.0, 400.0, 1000.0, 800.0, 0.001);
        let (r, _) = pointer_offset(501.0, 400.0, 1000.0, 800.0, 0.001);
        assert!((l + 0.001).abs() < 1e-6);
        assert!((r - 0.001).abs() < 1e-6);
        assert_eq!(pointer_offset(f64::NAN, 0.0, 10.0, 10.0, 0.001).0, 0.0);
    }

    #[test]
    fn pitch_passes_through_zero_at_vertical_center() {
        let (_, above) = pointer_offset(500.0, 399.5, 1000.0, 800.0, 0.001);
        let (_, center) = pointer_offset(500.0, 400.0, 1000.0, 800.0, 0.001);
        let (_, below) = pointer_offset(500.0, 400.5, 1000.0, 800.0, 0.001);
        assert_eq!(center, 0.0);
        assert!(above < 0.0 && below > 0.0);
        assert!((below - above - 0.001).abs() < 1e-6);
    }

    #[test]
    fn reduce_is_idempotent() {
        let cfg = GlobeConfig::default();
        let s0 = RenderState::initial(&cfg);
        let ev = PageEvent::SectionEnter(Section::Skills);
        let once = reduce(s0, &ev, &cfg.interaction);
        let twice = reduce(once, &ev, &cfg.interaction);
        assert_eq!(once, twice);
        assert_eq!(once.tint, cfg.interaction.tints.skills);
        assert_eq!(once.auto_rotate_speed, cfg.interaction.hover_rotate_speed);
    }

    #[test]
    fn leave_restores_defaults() {
        let cfg = GlobeConfig::default();
        let s0 = RenderState::initial(&cfg);
        let s1 = reduce(s0, &PageEvent::SectionEnter(Section::Projects), &cfg.interaction);
        let s2 = reduce(s1, &PageEvent::SectionLeave(Section::Projects), &cfg.interaction);
        assert_eq!(s2, s0);
    }

    #[test]
    fn stale_leave_is_ignored() {
        let cfg = GlobeConfig::default();
        let s0 = RenderState::initial(&cfg);
        let s1 = reduce(s0, &PageEvent::SectionEnter(Section::About), &cfg.interaction);
        let s2 = reduce(s1, &PageEvent::SectionEnter(Section::Contact), &cfg.interaction);
        let s3 = reduce(s2, &PageEvent::SectionLeave(Section::About), &cfg.interaction);
        assert_eq!(s3, s2);
        assert_eq!(s3.tint, cfg.interaction.tints.contact);
    }
}
