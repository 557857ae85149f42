use std::f32::consts::TAU;

use bevy::{prelude::*, render::view::RenderLayers, text::LineBreak};

use crate::{
    data::states::Theme,
    startup::render::RASTER_LAYER,
    systems::{
        colors::ThemeBook,
        time::{IntroSet, IntroTimeline},
    },
};


const CARET_GLYPH: char = '|';
/// Caret blink frequency in cycles per second of elapsed time, so blinking
/// is independent of frame rate.
const CARET_HZ: f32 = 1.6;
const HEADLINE_FONT_SIZE: f32 = 96.0;
const EXPLOSION_SCALE_GAIN: f32 = 3.0;

#[derive(Default, States, Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadlineSystemsActive {
    #[default]
    False,
    True,
}

pub struct HeadlinePlugin;
impl Plugin for HeadlinePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<HeadlineSystemsActive>()
            .add_systems(Update, activate_systems)
            .add_systems(
                Update,
                (Headline::typewriter, Headline::scale_and_fade)
                    .in_set(IntroSet::Drive)
                    .run_if(in_state(HeadlineSystemsActive::True)),
            )
            .add_systems(OnEnter(Theme::Dark), Headline::recolor)
            .add_systems(OnEnter(Theme::Light), Headline::recolor);
    }
}

fn activate_systems(
    mut state: ResMut<NextState<HeadlineSystemsActive>>,
    query: Query<&Headline>,
) {
    if !query.is_empty() {
        state.set(HeadlineSystemsActive::True)
    } else {
        state.set(HeadlineSystemsActive::False)
    }
}

/// The raster side of the reveal: a `Text2d` drawn only by the offscreen
/// camera, retyped as the clock advances.
#[derive(Component)]
#[require(Transform, Visibility)]
pub struct Headline {
    pub full_text: String,
    rendered: String,
}

impl Headline {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            full_text: text.into(),
            rendered: String::new(),
        }
    }

    /// Everything the raster entity needs to land on the offscreen camera.
    pub fn raster_bundle(text: &str, color: Color) -> impl Bundle {
        (
            Headline::new(text),
            Text2d::new(""),
            TextFont {
                font_size: HEADLINE_FONT_SIZE,
                ..default()
            },
            TextColor(color),
            TextLayout {
                justify: JustifyText::Center,
                linebreak: LineBreak::NoWrap,
            },
            RenderLayers::layer(RASTER_LAYER),
        )
    }

    fn typewriter(timeline: Res<IntroTimeline>, mut query: Query<(&mut Headline, &mut Text2d)>) {
        let elapsed = timeline.elapsed_secs();
        let typing_secs = timeline.timings.typing_end;
        for (mut headline, mut text) in query.iter_mut() {
            let chars: Vec<char> = headline.full_text.chars().collect();
            let visible = typed_prefix_len(elapsed, typing_secs, chars.len());

            let mut composed: String = chars[..visible].iter().collect();
            if visible < chars.len() && caret_visible(elapsed) {
                composed.push(CARET_GLYPH);
            }

            // Re-rasterizing is the expensive step; skip it while the
            // visible string is unchanged.
            if composed != headline.rendered {
                headline.rendered = composed.clone();
                text.0 = composed;
            }
        }
    }

    /// Blow the projected plane up and fade it out in lockstep with the
    /// particle explosion; drop it from the scene entirely after the
    /// intro's total duration.
    fn scale_and_fade(
        timeline: Res<IntroTimeline>,
        mut materials: ResMut<Assets<StandardMaterial>>,
        mut planes: Query<
            (
                &mut Transform,
                &mut Visibility,
                &MeshMaterial3d<StandardMaterial>,
            ),
            With<HeadlinePlane>,
        >,
    ) {
        let elapsed = timeline.elapsed_secs();
        let progress = timeline.explosion_progress();
        for (mut transform, mut visibility, material) in planes.iter_mut() {
            if elapsed >= timeline.timings.total {
                if *visibility != Visibility::Hidden {
                    *visibility = Visibility::Hidden;
                }
                continue;
            }

            transform.scale = Vec3::splat(1.0 + EXPLOSION_SCALE_GAIN * progress);

            let alpha = 1.0 - progress;
            if let Some(asset) = materials.get_mut(&material.0) {
                if asset.base_color.alpha() != alpha {
                    asset.base_color = Color::WHITE.with_alpha(alpha);
                }
            }
        }
    }

    /// Swap the fill color for the active theme. The typed prefix is left
    /// alone, so a mid-typing switch repaints exactly what was on screen.
    fn recolor(
        theme: Res<State<Theme>>,
        book: Res<ThemeBook>,
        mut query: Query<&mut TextColor, With<Headline>>,
    ) {
        let palette = book.0[*theme.get()];
        for mut color in query.iter_mut() {
            color.0 = palette.headline_color;
        }
    }
}

/// Projected quad showing the raster texture inside the 3D scene.
#[derive(Component)]
pub struct HeadlinePlane;

/// Characters revealed at `elapsed`: a non-decreasing step function that
/// reaches `len` exactly when elapsed hits the typing duration.
pub fn typed_prefix_len(elapsed: f32, typing_secs: f32, len: usize) -> usize {
    if typing_secs <= 0.0 || elapsed >= typing_secs {
        return len;
    }
    (((elapsed.max(0.0) / typing_secs) * len as f32).floor() as usize).min(len)
}

pub fn caret_visible(elapsed: f32) -> bool {
    (elapsed * CARET_HZ * TAU).sin() > 0.0
}
