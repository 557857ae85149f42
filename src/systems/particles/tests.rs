use std::time::Duration;

use bevy::{prelude::*, state::app::StatesPlugin};

use crate::{
    data::{
        config::IntroConfig,
        rng::RngPlugin,
        states::{Theme, ThemePlugin},
    },
    systems::{
        colors::ColorsPlugin, interaction::InteractionPlugin, time::IntroTimeline,
        time::TimelinePlugin,
    },
};

use super::{Particle, ParticleField, ParticlePlugin};

const TEST_COUNT: usize = 48;

fn make_particle_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<StandardMaterial>>();
    app.insert_resource(IntroConfig {
        particle_count: TEST_COUNT,
        ..IntroConfig::default()
    });
    app.add_plugins((
        RngPlugin,
        ThemePlugin,
        ColorsPlugin,
        TimelinePlugin,
        InteractionPlugin,
        ParticlePlugin,
    ));
    app
}

fn spawn_field(app: &mut App) -> Entity {
    let config = app.world().resource::<IntroConfig>().clone();
    let field = app
        .world_mut()
        .spawn(ParticleField::from_config(&config))
        .id();
    // Flush the insert hook and queue system activation; the gated update
    // systems start running on the next frame.
    app.update();
    field
}

fn set_elapsed(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<IntroTimeline>()
        .stopwatch
        .set_elapsed(Duration::from_secs_f32(secs));
}

fn collect_particles(app: &mut App) -> Vec<(Particle, Transform)> {
    let mut query = app.world_mut().query::<(&Particle, &Transform)>();
    let mut particles: Vec<(Particle, Transform)> = query
        .iter(app.world())
        .map(|(particle, transform)| (particle.clone(), *transform))
        .collect();
    particles.sort_by_key(|(particle, _)| particle.index);
    particles
}

#[test]
fn field_insert_spawns_every_particle_exactly_once() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    let particles = collect_particles(&mut app);
    assert_eq!(particles.len(), TEST_COUNT);
    for (expected, (particle, _)) in particles.iter().enumerate() {
        assert_eq!(particle.index, expected);
    }

    let config = app.world().resource::<IntroConfig>().clone();
    let outer = config.shell_inner_radius + config.shell_band;
    for (particle, transform) in &particles {
        let target_radius = particle.target.length();
        assert!(target_radius >= config.shell_inner_radius - 1e-4);
        assert!(target_radius <= outer + 1e-4);
        assert!(particle.start.length() <= 0.3 + 1e-4);
        assert_eq!(transform.translation, particle.start);
        assert!(particle.size >= 0.05 && particle.size <= 0.2);
    }

    // Further frames must not grow the set.
    app.update();
    app.update();
    assert_eq!(collect_particles(&mut app).len(), TEST_COUNT);
}

#[test]
fn formation_wobble_stays_near_start_and_never_releases() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    set_elapsed(&mut app, 1.0);
    app.update();

    for (particle, transform) in collect_particles(&mut app) {
        let offset = (transform.translation - particle.start).length();
        assert!(offset < 0.1, "wobble escaped the cluster: {offset}");
    }
    assert!(!app.world().resource::<IntroTimeline>().released);
}

#[test]
fn explosion_end_snaps_particles_onto_their_targets() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    let timings = app.world().resource::<IntroTimeline>().timings;
    set_elapsed(&mut app, timings.explosion_end + 0.01);
    app.update();

    assert!(app.world().resource::<IntroTimeline>().released);
    for (particle, transform) in collect_particles(&mut app) {
        let error = (transform.translation - particle.target).length();
        assert!(error < 1e-4, "particle {} off target by {error}", particle.index);
    }
}

#[test]
fn ambient_drift_respects_the_radius_clamp() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    let timings = app.world().resource::<IntroTimeline>().timings;
    set_elapsed(&mut app, timings.explosion_end + 0.01);
    app.update();

    // Fling one particle far outside the boundary.
    let runaway = {
        let mut query = app.world_mut().query_filtered::<Entity, With<Particle>>();
        query.iter(app.world()).next().expect("a particle")
    };
    app.world_mut()
        .get_mut::<Transform>(runaway)
        .expect("particle transform")
        .translation = Vec3::new(30.0, -40.0, 12.0);

    set_elapsed(&mut app, timings.total + 1.0);
    app.update();

    let max_radius = app.world().resource::<IntroConfig>().max_radius;
    for (particle, transform) in collect_particles(&mut app) {
        let radius = transform.translation.length();
        assert!(
            radius <= max_radius + 1e-3,
            "particle {} drifted out to {radius}",
            particle.index
        );
    }
}

#[test]
fn recolor_round_trip_leaves_rest_geometry_bit_identical() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    let before: Vec<(Vec3, Vec3)> = collect_particles(&mut app)
        .into_iter()
        .map(|(particle, _)| (particle.start, particle.target))
        .collect();

    for theme in [Theme::Light, Theme::Dark] {
        app.world_mut()
            .resource_mut::<NextState<Theme>>()
            .set(theme);
        app.update();
        app.update();
    }

    let after: Vec<(Vec3, Vec3)> = collect_particles(&mut app)
        .into_iter()
        .map(|(particle, _)| (particle.start, particle.target))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn recolor_rewrites_every_particle_material() {
    let mut app = make_particle_app();
    spawn_field(&mut app);

    let handles: Vec<Handle<StandardMaterial>> = {
        let mut query = app
            .world_mut()
            .query::<(&Particle, &MeshMaterial3d<StandardMaterial>)>();
        query
            .iter(app.world())
            .map(|(_, material)| material.0.clone())
            .collect()
    };
    assert_eq!(handles.len(), TEST_COUNT);

    app.world_mut()
        .resource_mut::<NextState<Theme>>()
        .set(Theme::Light);
    app.update();
    app.update();

    let materials = app.world().resource::<Assets<StandardMaterial>>();
    for handle in &handles {
        let material = materials.get(handle).expect("particle material");
        // The light palette renders flat particles without emissive glow.
        assert!(material.unlit);
        assert_eq!(material.emissive, LinearRgba::BLACK);
    }
}
