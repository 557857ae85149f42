use std::time::Duration;

use bevy::{prelude::*, state::app::StatesPlugin};

use crate::data::config::IntroConfig;

use super::{IntroCompleted, IntroSet, IntroTimeline, TimelinePlugin};
use crate::systems::phases::IntroPhase;

#[derive(Resource, Default)]
struct CompletionCount(usize);

fn count_completions(mut reader: EventReader<IntroCompleted>, mut count: ResMut<CompletionCount>) {
    count.0 += reader.read().count();
}

fn make_timeline_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(IntroConfig::default());
    app.add_plugins(TimelinePlugin);
    app.init_resource::<CompletionCount>();
    app.add_systems(Update, count_completions.after(IntroSet::Tick));
    app
}

fn set_elapsed(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<IntroTimeline>()
        .stopwatch
        .set_elapsed(Duration::from_secs_f32(secs));
}

#[test]
fn completion_does_not_fire_before_total() {
    let mut app = make_timeline_app();
    let total = app.world().resource::<IntroTimeline>().timings.total;

    set_elapsed(&mut app, total - 0.5);
    app.update();

    assert_eq!(app.world().resource::<CompletionCount>().0, 0);
    assert!(!app.world().resource::<IntroTimeline>().notified);
}

#[test]
fn completion_fires_exactly_once() {
    let mut app = make_timeline_app();
    let total = app.world().resource::<IntroTimeline>().timings.total;

    set_elapsed(&mut app, total + 0.1);
    app.update();
    app.update();
    app.update();

    assert_eq!(app.world().resource::<CompletionCount>().0, 1);
    assert!(app.world().resource::<IntroTimeline>().notified);
}

#[test]
fn reset_rearms_the_completion_guard() {
    let mut app = make_timeline_app();
    let total = app.world().resource::<IntroTimeline>().timings.total;

    set_elapsed(&mut app, total + 0.1);
    app.update();
    assert_eq!(app.world().resource::<CompletionCount>().0, 1);

    app.world_mut().resource_mut::<IntroTimeline>().reset();
    app.update();
    assert_eq!(app.world().resource::<CompletionCount>().0, 1);
    assert_eq!(
        app.world().resource::<IntroTimeline>().phase(),
        IntroPhase::Typing
    );

    set_elapsed(&mut app, total + 0.1);
    app.update();
    assert_eq!(app.world().resource::<CompletionCount>().0, 2);
}

#[test]
fn timeline_phase_tracks_the_stopwatch() {
    let mut app = make_timeline_app();
    let timings = app.world().resource::<IntroTimeline>().timings;

    set_elapsed(&mut app, timings.hold_end + 0.1);
    let timeline = app.world().resource::<IntroTimeline>();
    assert_eq!(timeline.phase(), IntroPhase::Explosion);
    assert!(timeline.explosion_progress() > 0.0);
}
