use std::{fmt, time::Duration};

use crate::{Animatable, InvalidConfiguration, PropertyCurve};

/// A lifecycle hook. Hooks get the animated context passed in instead of capturing mutable state.
pub type Hook<C> = Box<dyn FnMut(&mut C)>;

/// Property curves of one target, started at a fixed offset from the timeline's start.
pub struct Segment<C: Animatable> {
    pub(crate) target: C::Target,
    pub(crate) offset: Duration,
    pub(crate) curves: Vec<PropertyCurve>,
    pub(crate) on_start: Option<Hook<C>>,
    pub(crate) on_repeat: Option<Hook<C>>,
    pub(crate) on_complete: Option<Hook<C>>,
}

impl<C: Animatable> fmt::Debug for Segment<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("target", &self.target)
            .field("offset", &self.offset)
            .field("curves", &self.curves)
            .field("on_start", &self.on_start.is_some())
            .field("on_repeat", &self.on_repeat.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl<C: Animatable> Segment<C> {
    pub fn new(target: C::Target, offset: Duration) -> Self {
        Self {
            target,
            offset,
            curves: Vec::new(),
            on_start: None,
            on_repeat: None,
            on_complete: None,
        }
    }

    pub fn curve(mut self, curve: PropertyCurve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn curves(mut self, curves: impl IntoIterator<Item = PropertyCurve>) -> Self {
        self.curves.extend(curves);
        self
    }

    /// Invoked once when the segment activates, before any property is written.
    pub fn on_start(mut self, hook: impl FnMut(&mut C) + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Invoked at every cycle boundary of any of the segment's curves that starts another cycle.
    pub fn on_repeat(mut self, hook: impl FnMut(&mut C) + 'static) -> Self {
        self.on_repeat = Some(Box::new(hook));
        self
    }

    /// Invoked once after all curves finished.
    pub fn on_complete(mut self, hook: impl FnMut(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn target(&self) -> C::Target {
        self.target
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Offset plus the longest curve, `None` if a curve loops forever.
    pub fn end(&self) -> Option<Duration> {
        self.curves.iter().try_fold(self.offset, |end, curve| {
            Some(end.max(self.offset + curve.total_duration()?))
        })
    }
}

/// Segments that complete together, built per trigger and played exactly once.
pub struct Timeline<C: Animatable> {
    pub(crate) segments: Vec<Segment<C>>,
    pub(crate) owned: Vec<C::Target>,
    pub(crate) on_complete: Option<Hook<C>>,
}

impl<C: Animatable> fmt::Debug for Timeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("segments", &self.segments)
            .field("owned", &self.owned)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl<C: Animatable> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Animatable> Timeline<C> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            owned: Vec::new(),
            on_complete: None,
        }
    }

    pub fn segment(mut self, segment: Segment<C>) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn push(&mut self, segment: Segment<C>) {
        self.segments.push(segment);
    }

    /// Hands ownership of `target` to the timeline. It's released after the timeline completed.
    pub fn owns(mut self, target: C::Target) -> Self {
        self.owned.push(target);
        self
    }

    pub fn on_complete(mut self, hook: impl FnMut(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn segments(&self) -> &[Segment<C>] {
        &self.segments
    }

    /// The time from start to completion, `None` if the timeline never completes.
    pub fn duration(&self) -> Option<Duration> {
        self.segments
            .iter()
            .try_fold(Duration::ZERO, |end, segment| Some(end.max(segment.end()?)))
    }

    /// Checks that the timeline can be played. [`Sequencer::schedule`](crate::Sequencer::schedule)
    /// runs this before accepting a timeline.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.segments.is_empty() {
            return Err(InvalidConfiguration::EmptyTimeline);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.curves.is_empty() {
                return Err(InvalidConfiguration::EmptySegment { segment: index });
            }
            for curve in &segment.curves {
                curve.validate(index)?;
            }
        }
        Ok(())
    }
}
