use bevy::prelude::*;
use enum_map::{enum_map, EnumMap};
use rand::Rng;

use crate::data::states::Theme;

// Backdrop clear colors, matched to the host page's surfaces.
pub const DARK_CLEAR_COLOR: Color = Color::srgb(0.02, 0.02, 0.02);
pub const LIGHT_CLEAR_COLOR: Color = Color::srgb(0.968, 0.968, 0.976);

pub const DARK_HEADLINE_COLOR: Color = Color::srgb(0.95, 0.96, 1.0);
pub const LIGHT_HEADLINE_COLOR: Color = Color::srgb(0.08, 0.09, 0.12);

/// Emissive multiplier for glowing particles; needs bloom on the camera.
pub const PARTICLE_GLOW: f32 = 2.5;

pub const LASER_GLOW: f32 = 4.0;
pub const LASER_COLOR: Color = Color::srgb(0.576, 0.2, 0.918);

pub struct ColorsPlugin;
impl Plugin for ColorsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ThemeBook>();
    }
}

/// Color recipe for one theme. Particle hue walks a band anchored at
/// `base_hue`; saturation and lightness are sampled inside the ranges.
#[derive(Clone, Copy, Debug)]
pub struct ThemePalette {
    pub base_hue: f32,
    pub hue_band: f32,
    pub saturation_min: f32,
    pub saturation_range: f32,
    pub lightness_min: f32,
    pub lightness_range: f32,
    pub clear_color: Color,
    pub headline_color: Color,
    /// Emissive boost; zero renders flat unlit particles instead.
    pub glow: f32,
}

#[derive(Resource)]
pub struct ThemeBook(pub EnumMap<Theme, ThemePalette>);

impl Default for ThemeBook {
    fn default() -> Self {
        Self(enum_map! {
            Theme::Dark => ThemePalette {
                base_hue: 0.6,
                hue_band: 0.3,
                saturation_min: 0.7,
                saturation_range: 0.3,
                lightness_min: 0.6,
                lightness_range: 0.3,
                clear_color: DARK_CLEAR_COLOR,
                headline_color: DARK_HEADLINE_COLOR,
                glow: PARTICLE_GLOW,
            },
            Theme::Light => ThemePalette {
                base_hue: 0.55,
                hue_band: 0.35,
                saturation_min: 0.9,
                saturation_range: 0.1,
                lightness_min: 0.3,
                lightness_range: 0.15,
                clear_color: LIGHT_CLEAR_COLOR,
                headline_color: LIGHT_HEADLINE_COLOR,
                glow: 0.0,
            },
        })
    }
}

impl ThemePalette {
    /// Full per-particle color derivation. Recoloring recomputes every
    /// particle with this; nothing is patched incrementally.
    pub fn particle_color(&self, index: usize, rng: &mut impl Rng) -> Color {
        let hue_shift = (index as f32 * 0.1) % 1.0;
        let hue = (self.base_hue + hue_shift * self.hue_band) % 1.0;
        let saturation = self.saturation_min + rng.random::<f32>() * self.saturation_range;
        let lightness = self.lightness_min + rng.random::<f32>() * self.lightness_range;
        let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
        Color::srgb(r, g, b)
    }

    pub fn particle_material(&self, color: Color) -> StandardMaterial {
        if self.glow > 0.0 {
            // Lit-but-lightless: only the emissive term survives, which the
            // bloom pass turns into a glow halo.
            StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * self.glow,
                perceptual_roughness: 1.0,
                ..default()
            }
        } else {
            StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            }
        }
    }
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}
