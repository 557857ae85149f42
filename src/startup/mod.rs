use bevy::app::AppExit;
use bevy::prelude::*;

pub mod render;

use crate::{
    data::{config::ConfigPlugin, rng::RngPlugin, states::ThemePlugin},
    entities::headline::HeadlinePlugin,
    scenes::intro::IntroScenePlugin,
    systems::{
        colors::ColorsPlugin, interaction::InteractionPlugin, lasers::LaserPlugin,
        particles::ParticlePlugin, time::TimelinePlugin,
    },
};

use render::RenderPlugin;

pub struct StartupPlugin;
impl Plugin for StartupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ConfigPlugin,
            RngPlugin,
            ThemePlugin,
            ColorsPlugin,
            TimelinePlugin,
            InteractionPlugin,
            RenderPlugin,
            ParticlePlugin,
            HeadlinePlugin,
            LaserPlugin,
            IntroScenePlugin,
        ))
        .add_systems(Update, quit_on_esc);
    }
}

fn quit_on_esc(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    if keyboard_input.just_pressed(KeyCode::Escape) {
        app_exit_events.write(AppExit::Success);
    }
}
