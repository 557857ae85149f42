use std::f32::consts::TAU;

use bevy::prelude::*;
use noise::NoiseFn;

use crate::{
    data::{rng::GlobalRng, states::Theme},
    systems::{
        colors::{LASER_COLOR, LASER_GLOW},
        time::{IntroSet, IntroTimeline},
    },
};

pub const LASER_COUNT: usize = 10;
const LASER_BOUNDS: f32 = 6.0;
const LASER_DEPTH: f32 = -2.5;
const LASER_THICKNESS: f32 = 0.04;

pub struct LaserPlugin;
impl Plugin for LaserPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (LaserStreak::drift, LaserStreak::flicker).in_set(IntroSet::Drive),
        )
        .add_systems(OnEnter(Theme::Dark), LaserStreak::sync_theme)
        .add_systems(OnEnter(Theme::Light), LaserStreak::sync_theme);
    }
}

/// One drifting glow streak behind the particle field. Dark theme only.
#[derive(Component)]
pub struct LaserStreak {
    pub heading: f32,
    pub speed: f32,
    pub base_opacity: f32,
    noise_seed: f64,
}

impl LaserStreak {
    pub fn bundle(
        rng: &mut GlobalRng,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> impl Bundle {
        let length = rng.range(2.0, 5.0);
        let heading = rng.range(0.0, TAU);
        let speed = rng.range(0.3, 0.9);
        let base_opacity = rng.range(0.3, 0.7);
        let position = Vec3::new(
            rng.range(-LASER_BOUNDS, LASER_BOUNDS),
            rng.range(-LASER_BOUNDS, LASER_BOUNDS),
            LASER_DEPTH,
        );

        (
            LaserStreak {
                heading,
                speed,
                base_opacity,
                noise_seed: rng.range(0.0, 1000.0) as f64,
            },
            Mesh3d(meshes.add(Rectangle::new(length, LASER_THICKNESS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::LinearRgba(LASER_COLOR.to_linear() * LASER_GLOW)
                    .with_alpha(base_opacity),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_z(heading)),
        )
    }

    fn drift(time: Res<Time>, mut streaks: Query<(&LaserStreak, &mut Transform)>) {
        let dt = time.delta_secs();
        for (streak, mut transform) in streaks.iter_mut() {
            let step = Vec2::from_angle(streak.heading) * streak.speed * dt;
            transform.translation.x += step.x;
            transform.translation.y += step.y;

            // Wrap instead of bouncing, like a marquee.
            let translation = &mut transform.translation;
            for axis in [&mut translation.x, &mut translation.y] {
                if *axis > LASER_BOUNDS {
                    *axis = -LASER_BOUNDS;
                } else if *axis < -LASER_BOUNDS {
                    *axis = LASER_BOUNDS;
                }
            }
        }
    }

    fn flicker(
        timeline: Res<IntroTimeline>,
        rng: Res<GlobalRng>,
        mut materials: ResMut<Assets<StandardMaterial>>,
        streaks: Query<(&LaserStreak, &MeshMaterial3d<StandardMaterial>)>,
    ) {
        let t = timeline.elapsed_secs() as f64;
        for (streak, material) in streaks.iter() {
            let noise = rng.perlin.get([streak.noise_seed, t * 0.8, 0.0]) as f32;
            let alpha = streak.base_opacity * (0.55 + 0.45 * (noise * 0.5 + 0.5));
            if let Some(asset) = materials.get_mut(&material.0) {
                asset.base_color = asset.base_color.with_alpha(alpha);
            }
        }
    }

    fn sync_theme(
        theme: Res<State<Theme>>,
        mut streaks: Query<&mut Visibility, With<LaserStreak>>,
    ) {
        let desired = match theme.get() {
            Theme::Dark => Visibility::Inherited,
            Theme::Light => Visibility::Hidden,
        };
        for mut visibility in streaks.iter_mut() {
            if *visibility != desired {
                *visibility = desired;
            }
        }
    }
}
