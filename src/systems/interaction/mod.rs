use bevy::{prelude::*, window::PrimaryWindow};

use crate::systems::time::IntroSet;

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerTracker>()
            .add_systems(Update, PointerTracker::track.in_set(IntroSet::Tick));
    }
}

/// Last known cursor position, normalized to `[-1, 1]` on both axes with
/// +Y up. Holds its previous value while the cursor is outside the window.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerTracker {
    pub ndc: Vec2,
}

impl PointerTracker {
    fn track(
        windows: Query<&Window, With<PrimaryWindow>>,
        mut tracker: ResMut<PointerTracker>,
    ) {
        let Ok(window) = windows.single() else {
            return;
        };
        let Some(cursor) = window.cursor_position() else {
            return;
        };

        let width = window.width();
        let height = window.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        tracker.ndc = Vec2::new(
            (cursor.x / width) * 2.0 - 1.0,
            -((cursor.y / height) * 2.0 - 1.0),
        );
    }
}
