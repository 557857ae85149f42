use bevy::{
    asset::RenderAssetUsages,
    core_pipeline::{bloom::Bloom, tonemapping::Tonemapping},
    prelude::*,
    render::{
        camera::{ClearColorConfig, RenderTarget},
        render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages},
        view::RenderLayers,
    },
    window::{PrimaryWindow, WindowResized},
};

use crate::{
    data::states::Theme, entities::headline::HeadlinePlane, systems::colors::ThemeBook,
};

/// Layer the headline raster lives on; only the offscreen camera sees it.
pub const RASTER_LAYER: usize = 1;
pub const HEADLINE_PLANE_WIDTH: f32 = 9.0;

const FALLBACK_SURFACE: (u32, u32) = (1280, 720);

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct RasterCamera;

/// The offscreen image the headline raster camera draws into; the text
/// plane's material samples it.
#[derive(Resource)]
pub struct HeadlineRasterTarget(pub Handle<Image>);

pub struct RenderPlugin;
impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_render_target, setup_cameras).chain())
            .add_systems(Update, resize_raster_target)
            .add_systems(OnEnter(Theme::Dark), apply_theme)
            .add_systems(OnEnter(Theme::Light), apply_theme);
    }
}

fn raster_image(width: u32, height: u32) -> Image {
    let size = Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

pub fn setup_render_target(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
) {
    let (width, height) = windows
        .single()
        .map(|window| {
            (
                window.resolution.width() as u32,
                window.resolution.height() as u32,
            )
        })
        .unwrap_or(FALLBACK_SURFACE);

    let handle = images.add(raster_image(width.max(1), height.max(1)));
    commands.insert_resource(HeadlineRasterTarget(handle));
}

pub fn setup_cameras(
    mut commands: Commands,
    theme: Res<State<Theme>>,
    book: Res<ThemeBook>,
    render_target: Res<HeadlineRasterTarget>,
) {
    let palette = book.0[*theme.get()];

    // Scene camera: fixed perspective looking down -Z at the field.
    commands.spawn((
        Camera3d::default(),
        MainCamera,
        Camera {
            hdr: true,
            clear_color: ClearColorConfig::Custom(palette.clear_color),
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Tonemapping::TonyMcMapface,
        Bloom::default(),
        Transform::from_xyz(0.0, 0.0, 5.0),
        RenderLayers::layer(0),
    ));

    // Offscreen camera: rasterizes the headline into the target image.
    commands.spawn((
        Camera2d,
        RasterCamera,
        Camera {
            target: RenderTarget::Image(render_target.0.clone().into()),
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        RenderLayers::layer(RASTER_LAYER),
    ));
}

/// Theme swap without a scene rebuild: clear color tracks the palette and
/// bloom rides along with the glow setting.
fn apply_theme(
    mut commands: Commands,
    theme: Res<State<Theme>>,
    book: Res<ThemeBook>,
    mut cameras: Query<(Entity, &mut Camera), With<MainCamera>>,
) {
    let palette = book.0[*theme.get()];
    for (entity, mut camera) in cameras.iter_mut() {
        camera.clear_color = ClearColorConfig::Custom(palette.clear_color);
        if palette.glow > 0.0 {
            commands.entity(entity).insert(Bloom::default());
        } else {
            commands.entity(entity).remove::<Bloom>();
        }
    }
}

/// Window resizes resize the raster image and the projected quad, nothing
/// else; particle and timeline state must survive untouched.
fn resize_raster_target(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut resize_reader: EventReader<WindowResized>,
    render_target: Option<Res<HeadlineRasterTarget>>,
    planes: Query<&Mesh3d, With<HeadlinePlane>>,
) {
    let Some(render_target) = render_target else {
        return;
    };

    for _ in resize_reader.read() {
        let Ok(window) = windows.single() else {
            continue;
        };
        let width = window.resolution.width() as u32;
        let height = window.resolution.height() as u32;
        // Minimized windows report zero; skip those.
        if width == 0 || height == 0 {
            continue;
        }

        if let Some(image) = images.get_mut(&render_target.0) {
            if image.texture_descriptor.size.width != width
                || image.texture_descriptor.size.height != height
            {
                *image = raster_image(width, height);
            }
        }

        let aspect = height as f32 / width as f32;
        for mesh_handle in planes.iter() {
            if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
                *mesh = Rectangle::new(HEADLINE_PLANE_WIDTH, HEADLINE_PLANE_WIDTH * aspect).into();
            }
        }
    }
}
