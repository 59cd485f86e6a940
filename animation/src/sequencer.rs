use std::{fmt, time::Duration};

use log::{debug, trace, warn};

use crate::{Animatable, InvalidConfiguration, Segment, Timeline};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineHandle(u64);

/// Plays scheduled timelines.
///
/// Every timeline runs on its own monotonic clock that starts at zero when it's scheduled and is
/// advanced by [`Sequencer::tick`]. Timelines don't interact: completion of one has no effect on
/// the others.
pub struct Sequencer<C: Animatable> {
    next_handle: u64,
    running: Vec<RunningTimeline<C>>,
}

impl<C: Animatable> fmt::Debug for Sequencer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("next_handle", &self.next_handle)
            .field("running", &self.running.len())
            .finish()
    }
}

impl<C: Animatable> Default for Sequencer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Animatable> Sequencer<C> {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            running: Vec::new(),
        }
    }

    /// Schedules a timeline. Its clock starts now, segments activate on the following ticks.
    pub fn schedule(
        &mut self,
        timeline: Timeline<C>,
    ) -> Result<TimelineHandle, InvalidConfiguration> {
        timeline.validate()?;

        let handle = TimelineHandle(self.next_handle);
        self.next_handle += 1;
        debug!(
            "Scheduling timeline {handle:?} with {} segments, duration: {:?}",
            timeline.segments.len(),
            timeline.duration()
        );

        let Timeline {
            segments,
            owned,
            on_complete,
        } = timeline;

        self.running.push(RunningTimeline {
            handle,
            elapsed: Duration::ZERO,
            segments: segments.into_iter().map(RunningSegment::new).collect(),
            owned,
            on_complete,
        });
        Ok(handle)
    }

    /// Schedules a standalone tween, a timeline of one segment.
    pub fn tween(&mut self, segment: Segment<C>) -> Result<TimelineHandle, InvalidConfiguration> {
        self.schedule(Timeline::new().segment(segment))
    }

    pub fn is_running(&self, handle: TimelineHandle) -> bool {
        self.running.iter().any(|t| t.handle == handle)
    }

    pub fn running(&self) -> impl Iterator<Item = TimelineHandle> + '_ {
        self.running.iter().map(|t| t.handle)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advances all timelines by `delta`, writes the property values into `context`, and invokes
    /// hooks.
    ///
    /// Returns the timelines that completed in this tick. Completed timelines are removed and
    /// their owned targets released.
    pub fn tick(&mut self, delta: Duration, context: &mut C) -> Vec<TimelineHandle> {
        let mut completed = Vec::new();
        self.running.retain_mut(|timeline| {
            if !timeline.advance(delta, context) {
                return true;
            }
            completed.push(timeline.handle);
            false
        });
        completed
    }
}

struct RunningTimeline<C: Animatable> {
    handle: TimelineHandle,
    elapsed: Duration,
    segments: Vec<RunningSegment<C>>,
    owned: Vec<C::Target>,
    on_complete: Option<crate::Hook<C>>,
}

impl<C: Animatable> RunningTimeline<C> {
    /// Returns `true` if the timeline completed.
    fn advance(&mut self, delta: Duration, context: &mut C) -> bool {
        self.elapsed += delta;

        // Declaration order, so ties in offsets are applied in the order the segments were added.
        for segment in &mut self.segments {
            segment.advance(self.elapsed, context);
        }

        if !self.segments.iter().all(|s| s.phase == Phase::Completed) {
            return false;
        }

        debug!("Timeline {:?} completed at {:?}", self.handle, self.elapsed);
        if let Some(hook) = self.on_complete.as_mut() {
            hook(context);
        }
        for target in self.owned.drain(..) {
            context.release(target);
        }
        true
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Pending,
    Active,
    Completed,
}

struct RunningSegment<C: Animatable> {
    segment: Segment<C>,
    phase: Phase,
    /// Per curve: the value at activation and the cycles completed so far.
    progress: Vec<CurveProgress>,
}

#[derive(Debug, Default)]
struct CurveProgress {
    from: Option<f64>,
    completed_cycles: u64,
    finished: bool,
}

impl<C: Animatable> RunningSegment<C> {
    fn new(segment: Segment<C>) -> Self {
        Self {
            segment,
            phase: Phase::Pending,
            progress: Vec::new(),
        }
    }

    fn advance(&mut self, elapsed: Duration, context: &mut C) {
        let segment = &mut self.segment;

        if self.phase == Phase::Pending {
            if segment.offset > elapsed {
                return;
            }
            self.phase = Phase::Active;
            if let Some(hook) = segment.on_start.as_mut() {
                hook(context);
            }
            // Start values are taken after the start hook, so it may position the target.
            self.progress = segment
                .curves
                .iter()
                .map(|curve| {
                    let from = context.property(segment.target, curve.property);
                    if from.is_none() {
                        warn!(
                            "Target {:?} has no {}, curve is skipped",
                            segment.target, curve.property
                        );
                    }
                    CurveProgress {
                        from,
                        ..Default::default()
                    }
                })
                .collect();
            trace!("Segment on {:?} started", segment.target);
        }

        if self.phase != Phase::Active {
            return;
        }

        let local = elapsed - segment.offset;
        let mut repeats = 0;
        for (curve, progress) in segment.curves.iter().zip(&mut self.progress) {
            if progress.finished {
                continue;
            }
            let Some(from) = progress.from else {
                progress.finished = curve.total_duration().is_some_and(|total| local >= total);
                continue;
            };

            let sample = curve.sample(from, local);
            context.set_property(segment.target, curve.property, sample.value);
            repeats += curve.repeat_boundaries(sample.completed_cycles)
                - curve.repeat_boundaries(progress.completed_cycles);
            progress.completed_cycles = sample.completed_cycles;
            progress.finished = sample.finished;
        }

        if let Some(hook) = segment.on_repeat.as_mut() {
            for _ in 0..repeats {
                hook(context);
            }
        }

        if self.progress.iter().all(|p| p.finished) {
            self.phase = Phase::Completed;
            trace!("Segment on {:?} completed", segment.target);
            if let Some(hook) = segment.on_complete.as_mut() {
                hook(context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{Interpolation, Property, PropertyCurve};

    /// A minimal world: properties by target, and a log of hook invocations.
    #[derive(Debug, Default)]
    struct Board {
        values: HashMap<(u32, Property), f64>,
        released: Vec<u32>,
        log: Vec<&'static str>,
    }

    impl Board {
        fn with(mut self, target: u32, property: Property, value: f64) -> Self {
            self.values.insert((target, property), value);
            self
        }

        fn get(&self, target: u32, property: Property) -> f64 {
            self.values[&(target, property)]
        }

        fn count(&self, entry: &str) -> usize {
            self.log.iter().filter(|e| **e == entry).count()
        }
    }

    impl Animatable for Board {
        type Target = u32;

        fn property(&self, target: u32, property: Property) -> Option<f64> {
            self.values.get(&(target, property)).copied()
        }

        fn set_property(&mut self, target: u32, property: Property, value: f64) {
            self.values.insert((target, property), value);
        }

        fn release(&mut self, target: u32) {
            self.values.retain(|(t, _), _| *t != target);
            self.released.push(target);
        }
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn move_x(target: u32, offset: u64, to: f64, duration: u64) -> Segment<Board> {
        Segment::new(target, ms(offset)).curve(PropertyCurve::new(Property::X, to, ms(duration)))
    }

    #[test]
    fn completes_after_the_last_segment_and_not_before() {
        let mut board = Board::default()
            .with(1, Property::X, 0.0)
            .with(2, Property::X, 0.0);
        let mut sequencer = Sequencer::new();
        let handle = sequencer
            .schedule(
                Timeline::new()
                    .segment(move_x(1, 0, 100.0, 2000))
                    .segment(move_x(2, 2000, 100.0, 2000))
                    .on_complete(|board: &mut Board| board.log.push("done")),
            )
            .unwrap();

        for _ in 0..3 {
            assert!(sequencer.tick(ms(1000), &mut board).is_empty());
        }
        assert!(sequencer.tick(ms(999), &mut board).is_empty());
        assert_eq!(board.count("done"), 0);
        assert!(sequencer.is_running(handle));

        assert_eq!(sequencer.tick(ms(1), &mut board), vec![handle]);
        assert_eq!(board.count("done"), 1);
        assert!(sequencer.is_empty());

        sequencer.tick(ms(1000), &mut board);
        assert_eq!(board.count("done"), 1);
    }

    #[test]
    fn segments_start_at_their_offset_from_the_current_value() {
        let mut board = Board::default().with(1, Property::X, 50.0);
        let mut sequencer = Sequencer::new();
        sequencer
            .schedule(
                Timeline::new()
                    .segment(move_x(1, 0, 150.0, 1000))
                    .segment(move_x(1, 2000, 50.0, 1000)),
            )
            .unwrap();

        sequencer.tick(ms(500), &mut board);
        assert_abs_diff_eq!(board.get(1, Property::X), 100.0, epsilon = 1e-9);
        sequencer.tick(ms(1000), &mut board);
        assert_eq!(board.get(1, Property::X), 150.0);
        // The second segment hasn't started yet.
        sequencer.tick(ms(400), &mut board);
        assert_eq!(board.get(1, Property::X), 150.0);
        // It started 100ms ago, and not from the tick it activated in.
        sequencer.tick(ms(200), &mut board);
        assert_abs_diff_eq!(board.get(1, Property::X), 140.0, epsilon = 1e-9);
    }

    #[test]
    fn hooks_fire_once_per_lifecycle_event() {
        let mut board = Board::default().with(7, Property::Y, 240.0);
        let mut sequencer = Sequencer::new();
        let bounce = PropertyCurve::new(Property::Y, 140.0, ms(300))
            .with(Interpolation::SineOut)
            .yoyo()
            .repeat(4);
        sequencer
            .tween(
                Segment::new(7, Duration::ZERO)
                    .curve(bounce)
                    .on_start(|b: &mut Board| b.log.push("start"))
                    .on_repeat(|b: &mut Board| b.log.push("repeat"))
                    .on_complete(|b: &mut Board| b.log.push("complete")),
            )
            .unwrap();

        for _ in 0..40 {
            sequencer.tick(ms(100), &mut board);
        }

        assert_eq!(board.count("start"), 1);
        assert_eq!(board.count("repeat"), 4);
        assert_eq!(board.count("complete"), 1);
        assert_eq!(board.get(7, Property::Y), 240.0);
    }

    #[test]
    fn large_ticks_fire_every_skipped_repeat() {
        let mut board = Board::default().with(1, Property::Y, 0.0);
        let mut sequencer = Sequencer::new();
        sequencer
            .tween(
                Segment::new(1, Duration::ZERO)
                    .curve(PropertyCurve::new(Property::Y, 10.0, ms(100)).repeat(3))
                    .on_repeat(|b: &mut Board| b.log.push("repeat")),
            )
            .unwrap();

        sequencer.tick(ms(250), &mut board);
        assert_eq!(board.count("repeat"), 2);
        sequencer.tick(ms(1000), &mut board);
        assert_eq!(board.count("repeat"), 3);
        assert!(sequencer.is_empty());
    }

    #[test]
    fn owned_targets_are_released_on_completion() {
        let mut board = Board::default().with(9, Property::Alpha, 1.0);
        let mut sequencer = Sequencer::new();
        sequencer
            .schedule(
                Timeline::new()
                    .segment(
                        Segment::new(9, Duration::ZERO)
                            .curve(PropertyCurve::new(Property::Alpha, 0.0, ms(1000))),
                    )
                    .owns(9),
            )
            .unwrap();

        sequencer.tick(ms(900), &mut board);
        assert!(board.released.is_empty());
        sequencer.tick(ms(100), &mut board);
        assert_eq!(board.released, vec![9]);
        assert_eq!(board.property(9, Property::Alpha), None);
    }

    #[test]
    fn infinite_tweens_keep_running() {
        let mut board = Board::default().with(1, Property::Rotation, 0.0);
        let mut sequencer = Sequencer::new();
        let handle = sequencer
            .tween(
                Segment::new(1, Duration::ZERO).curve(
                    PropertyCurve::new(Property::Rotation, 1.0, ms(500))
                        .yoyo()
                        .repeat(-1),
                ),
            )
            .unwrap();

        for _ in 0..100 {
            sequencer.tick(ms(60), &mut board);
        }
        assert!(sequencer.is_running(handle));
        let rotation = board.get(1, Property::Rotation);
        assert!((0.0..=1.0).contains(&rotation));
    }

    #[test]
    fn missing_targets_still_complete_on_time() {
        let mut board = Board::default();
        let mut sequencer = Sequencer::new();
        sequencer.tween(move_x(3, 0, 10.0, 100)).unwrap();

        sequencer.tick(ms(50), &mut board);
        assert_eq!(sequencer.len(), 1);
        sequencer.tick(ms(50), &mut board);
        assert!(sequencer.is_empty());
        assert_eq!(board.property(3, Property::X), None);
    }

    #[test]
    fn timelines_run_independently() {
        let mut board = Board::default()
            .with(1, Property::X, 0.0)
            .with(2, Property::X, 0.0);
        let mut sequencer = Sequencer::new();
        let first = sequencer.tween(move_x(1, 0, 10.0, 1000)).unwrap();
        sequencer.tick(ms(500), &mut board);
        let second = sequencer.tween(move_x(2, 0, 10.0, 1000)).unwrap();

        assert_eq!(sequencer.tick(ms(500), &mut board), vec![first]);
        assert!(sequencer.is_running(second));
        assert_eq!(sequencer.tick(ms(500), &mut board), vec![second]);
    }

    #[test]
    fn rejects_invalid_timelines() {
        let mut sequencer = Sequencer::<Board>::new();
        assert_eq!(
            sequencer.schedule(Timeline::new()).unwrap_err(),
            InvalidConfiguration::EmptyTimeline
        );
        assert_eq!(
            sequencer
                .schedule(Timeline::new().segment(Segment::new(1, Duration::ZERO)))
                .unwrap_err(),
            InvalidConfiguration::EmptySegment { segment: 0 }
        );
        assert!(sequencer.is_empty());
    }

    proptest! {
        #[test]
        fn completion_fires_exactly_once_after_every_segment(
            segments in prop::collection::vec((0u64..3000, 0u64..3000), 1..8),
            ticks in prop::collection::vec(1u64..400, 1..200),
        ) {
            let mut board = Board::default();
            let mut timeline = Timeline::new()
                .on_complete(|b: &mut Board| b.log.push("timeline"));
            for (index, (offset, duration)) in segments.iter().enumerate() {
                let target = index as u32;
                board.values.insert((target, Property::X), 0.0);
                timeline.push(
                    move_x(target, *offset, 1.0, *duration)
                        .on_complete(|b: &mut Board| b.log.push("segment")),
                );
            }
            let end = timeline.duration().unwrap();

            let mut sequencer = Sequencer::new();
            sequencer.schedule(timeline).unwrap();

            let mut now = Duration::ZERO;
            for tick in ticks {
                now += ms(tick);
                let completed = !sequencer.tick(ms(tick), &mut board).is_empty();
                if now < end {
                    prop_assert!(!completed);
                    prop_assert_eq!(board.count("timeline"), 0);
                } else {
                    // Completion is reported in the first tick reaching the end.
                    prop_assert_eq!(completed, now - ms(tick) < end);
                    prop_assert_eq!(board.count("segment"), segments.len());
                    prop_assert_eq!(board.count("timeline"), 1);
                    prop_assert!(sequencer.is_empty());
                }
            }
        }
    }
}
