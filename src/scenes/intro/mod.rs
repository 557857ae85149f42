use bevy::{prelude::*, window::PrimaryWindow};

use crate::{
    data::{config::IntroConfig, rng::GlobalRng, states::Theme},
    entities::headline::{Headline, HeadlinePlane},
    startup::render::{HeadlineRasterTarget, HEADLINE_PLANE_WIDTH},
    systems::{
        colors::ThemeBook,
        lasers::{LaserStreak, LASER_COUNT},
        particles::ParticleField,
        time::{IntroCompleted, IntroTimeline},
    },
};

pub struct IntroScenePlugin;
impl Plugin for IntroScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_intro_scene)
            .add_systems(Update, log_completion);
    }
}

#[derive(Component)]
#[require(Transform, Visibility)]
pub struct IntroSceneRoot;

fn spawn_intro_scene(
    mut commands: Commands,
    config: Res<IntroConfig>,
    theme: Res<State<Theme>>,
    book: Res<ThemeBook>,
    render_target: Option<Res<HeadlineRasterTarget>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut timeline: ResMut<IntroTimeline>,
    mut rng: ResMut<GlobalRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Spawning is the mount point: the intro restarts from phase zero.
    timeline.reset();

    // The clock keeps running without visuals, so a host waiting on the
    // completion event is never left hanging.
    let Some(render_target) = render_target else {
        warn!("No raster target available; skipping intro visuals.");
        return;
    };
    let Ok(window) = windows.single() else {
        warn!("No primary window; skipping intro visuals.");
        return;
    };

    let palette = book.0[*theme.get()];
    let width = window.resolution.width();
    let aspect = if width > 0.0 {
        window.resolution.height() / width
    } else {
        9.0 / 16.0
    };

    let plane_mesh = meshes.add(Rectangle::new(
        HEADLINE_PLANE_WIDTH,
        HEADLINE_PLANE_WIDTH * aspect,
    ));
    let plane_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(render_target.0.clone()),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    commands
        .spawn((IntroSceneRoot, Name::new("intro_scene")))
        .with_children(|parent| {
            parent.spawn(ParticleField::from_config(&config));
            parent.spawn((
                HeadlinePlane,
                Mesh3d(plane_mesh),
                MeshMaterial3d(plane_material),
                Transform::default(),
            ));
            for _ in 0..LASER_COUNT {
                parent.spawn(LaserStreak::bundle(&mut rng, &mut meshes, &mut materials));
            }
        });

    // The raster text sits outside the 3D hierarchy; only the offscreen
    // camera's layer sees it.
    commands.spawn(Headline::raster_bundle(
        &config.headline,
        palette.headline_color,
    ));
}

// Host stand-in: the real page would un-hide its content here.
fn log_completion(mut completed: EventReader<IntroCompleted>) {
    for _ in completed.read() {
        info!("Intro finished; revealing host content.");
    }
}
