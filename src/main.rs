use bevy::prelude::*;

mod data;
mod entities;
mod scenes;
mod startup;
mod systems;

use crate::startup::StartupPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(StartupPlugin)
        .run();
}
