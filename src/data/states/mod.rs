use bevy::prelude::*;
use enum_map::Enum;

/// Visual theme supplied by the host page. Never affects phase timing.
#[derive(Default, States, Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

pub struct ThemePlugin;
impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Theme>()
            .add_systems(Update, toggle_theme_on_key);
    }
}

// Stand-in for the host page's theme switch.
fn toggle_theme_on_key(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    theme: Res<State<Theme>>,
    mut next_theme: ResMut<NextState<Theme>>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyT) {
        next_theme.set(theme.get().toggled());
    }
}
