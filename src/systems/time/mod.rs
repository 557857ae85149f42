use bevy::{prelude::*, time::Stopwatch};

use crate::{
    data::config::IntroConfig,
    systems::phases::{IntroPhase, PhaseTimings},
};

#[cfg(test)]
mod tests;

/// Frame-order spine for the intro: advance the clock, drive positions,
/// then bound them.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum IntroSet {
    Tick,
    Drive,
    Clamp,
}

/// Written exactly once per timeline lifetime, the first frame elapsed time
/// reaches the total duration. The host reveals its content on this.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroCompleted;

#[derive(Resource)]
pub struct IntroTimeline {
    pub stopwatch: Stopwatch,
    pub timings: PhaseTimings,
    /// Latched the frame explosion progress reaches 1.0; never unset.
    pub released: bool,
    /// Latched when the completion event goes out; never unset.
    pub notified: bool,
}

impl IntroTimeline {
    pub fn new(timings: PhaseTimings) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            timings,
            released: false,
            notified: false,
        }
    }

    /// Restart the intro from phase zero. One-shot guards re-arm.
    pub fn reset(&mut self) {
        self.stopwatch.reset();
        self.released = false;
        self.notified = false;
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.stopwatch.elapsed_secs()
    }

    pub fn phase(&self) -> IntroPhase {
        IntroPhase::at(self.elapsed_secs(), &self.timings)
    }

    pub fn explosion_progress(&self) -> f32 {
        self.timings.explosion_progress(self.elapsed_secs())
    }

    fn tick(time: Res<Time>, mut timeline: ResMut<IntroTimeline>) {
        timeline.stopwatch.tick(time.delta());
    }

    fn notify_completion(
        mut timeline: ResMut<IntroTimeline>,
        mut completed: EventWriter<IntroCompleted>,
    ) {
        if !timeline.notified && timeline.elapsed_secs() >= timeline.timings.total {
            timeline.notified = true;
            completed.write(IntroCompleted);
        }
    }
}

pub struct TimelinePlugin;
impl Plugin for TimelinePlugin {
    fn build(&self, app: &mut App) {
        let timings = app
            .world()
            .get_resource::<IntroConfig>()
            .map(PhaseTimings::from_config)
            .unwrap_or_default();

        app.add_event::<IntroCompleted>()
            .insert_resource(IntroTimeline::new(timings))
            .configure_sets(
                Update,
                (
                    IntroSet::Tick,
                    IntroSet::Drive.after(IntroSet::Tick),
                    IntroSet::Clamp.after(IntroSet::Drive),
                ),
            )
            .add_systems(
                Update,
                (IntroTimeline::tick, IntroTimeline::notify_completion)
                    .chain()
                    .in_set(IntroSet::Tick),
            );
    }
}
