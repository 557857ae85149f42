use std::f32::consts::TAU;

use bevy::{
    ecs::{component::HookContext, world::DeferredWorld},
    prelude::*,
};
use rand_distr::{Distribution, UnitSphere};

use crate::{
    data::{config::IntroConfig, rng::GlobalRng, states::Theme},
    systems::{
        colors::ThemeBook,
        interaction::PointerTracker,
        phases::{ease_out_cubic, IntroPhase},
        time::{IntroSet, IntroTimeline},
    },
};

#[cfg(test)]
mod tests;

// Entry cluster and per-particle sprite sizing.
const START_CLUSTER_MIN: f32 = 0.1;
const START_CLUSTER_MAX: f32 = 0.3;
const SIZE_MIN: f32 = 0.05;
const SIZE_MAX: f32 = 0.2;

// Formation-phase cosmetic motion.
const WOBBLE_SWING: f32 = 0.05;
const WOBBLE_LIFT: f32 = 0.02;

// Free-phase ambient motion.
const POINTER_RADIUS: f32 = 0.5;
const REPULSION_STRENGTH: f32 = 0.1;
const SPIKE_SCALE: f32 = 2.0;
const JITTER_SCALE: f32 = 0.005;
const FIELD_SPIN_Y: f32 = 0.12;
const FIELD_SPIN_X: f32 = 0.06;

#[derive(Default, States, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParticleSystemsActive {
    #[default]
    False,
    True,
}

pub struct ParticlePlugin;
impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ParticleSystemsActive>()
            .add_systems(Update, activate_systems)
            .add_systems(
                Update,
                (
                    ParticleField::sync_visibility,
                    ParticleField::wobble,
                    ParticleField::drift,
                    ParticleField::explode,
                    ParticleField::rotate,
                )
                    .chain()
                    .in_set(IntroSet::Drive)
                    .run_if(in_state(ParticleSystemsActive::True)),
            )
            .add_systems(
                Update,
                ParticleField::clamp_to_shell
                    .in_set(IntroSet::Clamp)
                    .run_if(in_state(ParticleSystemsActive::True)),
            )
            .add_systems(OnEnter(Theme::Dark), ParticleField::recolor)
            .add_systems(OnEnter(Theme::Light), ParticleField::recolor);
    }
}

fn activate_systems(
    mut state: ResMut<NextState<ParticleSystemsActive>>,
    query: Query<&ParticleField>,
) {
    if !query.is_empty() {
        state.set(ParticleSystemsActive::True)
    } else {
        state.set(ParticleSystemsActive::False)
    }
}

/// Root of the field. Inserting it spawns every particle child exactly
/// once; the set never grows or shrinks afterwards.
#[derive(Component, Clone)]
#[component(on_insert = ParticleField::on_insert)]
#[require(Transform, Visibility)]
pub struct ParticleField {
    pub count: usize,
    pub shell_inner_radius: f32,
    pub shell_band: f32,
    pub max_radius: f32,
}

impl ParticleField {
    pub fn from_config(config: &IntroConfig) -> Self {
        Self {
            count: config.particle_count,
            shell_inner_radius: config.shell_inner_radius,
            shell_band: config.shell_band,
            max_radius: config.max_radius,
        }
    }
}

/// One point of the field. `start` and `target` are fixed at spawn; only
/// the entity's `Transform` moves.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub index: usize,
    pub start: Vec3,
    pub target: Vec3,
    pub size: f32,
    seed_angle: f32,
}

impl ParticleField {
    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(field) = world.entity(entity).get::<ParticleField>().cloned() else {
            return;
        };

        let theme = world
            .get_resource::<State<Theme>>()
            .map(|state| *state.get())
            .unwrap_or_default();
        let palette = match world.get_resource::<ThemeBook>() {
            Some(book) => book.0[theme],
            None => ThemeBook::default().0[theme],
        };

        if world.get_resource::<GlobalRng>().is_none() {
            warn!("GlobalRng not found! Cannot spawn particle field.");
            return;
        }
        if world.get_resource::<Assets<Mesh>>().is_none()
            || world.get_resource::<Assets<StandardMaterial>>().is_none()
        {
            warn!("Mesh/material assets unavailable! Particle field not spawned.");
            return;
        }

        // Sample the whole field in one pass before touching any other
        // resource.
        let samples = {
            let mut rng = world.resource_mut::<GlobalRng>();
            let mut samples = Vec::with_capacity(field.count);
            for index in 0..field.count {
                let shell_dir = Vec3::from(UnitSphere.sample(&mut rng.uniform));
                let target = shell_dir * (field.shell_inner_radius + rng.range(0.0, field.shell_band));

                let cluster_dir = Vec3::from(UnitSphere.sample(&mut rng.uniform));
                let start = cluster_dir * rng.range(START_CLUSTER_MIN, START_CLUSTER_MAX);

                let size = rng.range(SIZE_MIN, SIZE_MAX);
                let color = palette.particle_color(index, &mut rng.uniform);
                samples.push((start, target, size, color));
            }
            samples
        };

        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Mesh::from(Sphere::new(0.5)));
        let materials: Vec<Handle<StandardMaterial>> = {
            let mut assets = world.resource_mut::<Assets<StandardMaterial>>();
            samples
                .iter()
                .map(|(_, _, _, color)| assets.add(palette.particle_material(*color)))
                .collect()
        };

        let count = field.count.max(1) as f32;
        world.commands().entity(entity).with_children(|parent| {
            for (index, ((start, target, size, _), material)) in
                samples.into_iter().zip(materials).enumerate()
            {
                parent.spawn((
                    Particle {
                        index,
                        start,
                        target,
                        size,
                        seed_angle: index as f32 / count * TAU,
                    },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material),
                    Transform::from_translation(start).with_scale(Vec3::splat(size)),
                ));
            }
        });
    }

    // The field stays hidden behind the headline until the explosion hands
    // it the stage.
    fn sync_visibility(
        timeline: Res<IntroTimeline>,
        mut fields: Query<&mut Visibility, With<ParticleField>>,
    ) {
        let desired = if timeline.phase() < IntroPhase::Explosion {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        for mut visibility in fields.iter_mut() {
            if *visibility != desired {
                *visibility = desired;
            }
        }
    }

    /// Typing/Hold: cosmetic oscillation around each particle's start
    /// point. Reads nothing but `start` and the clock.
    fn wobble(timeline: Res<IntroTimeline>, mut particles: Query<(&Particle, &mut Transform)>) {
        if timeline.phase() > IntroPhase::Hold {
            return;
        }
        let t = timeline.elapsed_secs();
        for (particle, mut transform) in particles.iter_mut() {
            let i = particle.index as f32;
            let swing = (4.0 * t + 0.1 * i).sin() * WOBBLE_SWING;
            let theta = particle.seed_angle + t;
            transform.translation = particle.start
                + Vec3::new(
                    theta.sin() * swing,
                    (3.0 * t + 0.05 * i).sin() * WOBBLE_LIFT,
                    theta.cos() * swing,
                );
        }
    }

    /// The only rule that may read `target`: eases every particle from its
    /// start point onto the resting shell, then latches the release flag.
    fn explode(
        mut timeline: ResMut<IntroTimeline>,
        mut particles: Query<(&Particle, &mut Transform)>,
    ) {
        if timeline.phase() < IntroPhase::Explosion || timeline.released {
            return;
        }
        let progress = timeline.explosion_progress();
        let eased = ease_out_cubic(progress);
        for (particle, mut transform) in particles.iter_mut() {
            transform.translation = particle.start.lerp(particle.target, eased);
        }
        if progress >= 1.0 {
            timeline.released = true;
        }
    }

    /// Post-release ambient motion: pointer repulsion with a vertical
    /// spike inside the influence disc, isotropic jitter outside it.
    fn drift(
        timeline: Res<IntroTimeline>,
        pointer: Res<PointerTracker>,
        mut rng: ResMut<GlobalRng>,
        mut particles: Query<(&Particle, &mut Transform)>,
    ) {
        if !timeline.released {
            return;
        }
        let t = timeline.elapsed_secs();
        for (particle, mut transform) in particles.iter_mut() {
            let i = particle.index as f32;
            let position = transform.translation;
            let proxy = Vec2::new(
                position.x / 5.0 + pointer.ndc.x,
                position.y / 5.0 + pointer.ndc.y,
            ) * 0.5;
            let distance = proxy.length();

            if distance < POINTER_RADIUS {
                let force = (POINTER_RADIUS - distance) * REPULSION_STRENGTH;
                let angle = proxy.y.atan2(proxy.x);
                let spike = (2.0 * t + 0.1 * i).sin() * force * SPIKE_SCALE;
                transform.translation += Vec3::new(
                    angle.cos() * force * 0.5,
                    angle.sin() * force * 0.5,
                    spike,
                );
            } else {
                let mut nudge = rng.jitter(JITTER_SCALE);
                nudge.z *= 0.5;
                transform.translation += nudge;
            }
        }
    }

    fn rotate(
        timeline: Res<IntroTimeline>,
        time: Res<Time>,
        mut fields: Query<&mut Transform, With<ParticleField>>,
    ) {
        if timeline.phase() != IntroPhase::Free {
            return;
        }
        let dt = time.delta_secs();
        for mut transform in fields.iter_mut() {
            transform.rotate_y(FIELD_SPIN_Y * dt);
            transform.rotate_x(FIELD_SPIN_X * dt);
        }
    }

    /// Accumulated jitter must never let a particle escape the field:
    /// anything past the boundary is rescaled back onto it.
    fn clamp_to_shell(
        timeline: Res<IntroTimeline>,
        fields: Query<&ParticleField>,
        mut particles: Query<&mut Transform, With<Particle>>,
    ) {
        if !timeline.released {
            return;
        }
        let Ok(field) = fields.single() else {
            return;
        };
        for mut transform in particles.iter_mut() {
            let radius = transform.translation.length();
            if radius > field.max_radius {
                transform.translation *= field.max_radius / radius;
            }
        }
    }

    /// Full recompute of every particle's material for the active theme.
    /// Rest geometry is never touched here.
    fn recolor(
        theme: Res<State<Theme>>,
        book: Res<ThemeBook>,
        mut rng: ResMut<GlobalRng>,
        mut materials: ResMut<Assets<StandardMaterial>>,
        particles: Query<(&Particle, &MeshMaterial3d<StandardMaterial>)>,
    ) {
        let palette = book.0[*theme.get()];
        for (particle, material) in particles.iter() {
            let color = palette.particle_color(particle.index, &mut rng.uniform);
            if let Some(asset) = materials.get_mut(&material.0) {
                *asset = palette.particle_material(color);
            }
        }
    }
}
