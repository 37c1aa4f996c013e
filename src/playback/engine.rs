use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::core::{Coordinate, Route};
use crate::error::{PlaybackError, PlaybackResult};
use crate::playback::{
    InstructionDispatcher, PlaybackCursor, PlaybackSnapshot, PlaybackState, RouteBuffer, RouteWatch,
    SpeedController,
};
use crate::sink::{NarrationSink, RenderSink};

/// Result of moving a cursor by some distance along the route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub cursor: PlaybackCursor,
    /// Coordinate index the cursor snapped onto, if any
    pub reached: Option<usize>,
    /// Snapped onto the last coordinate and wrapped back to index 0
    pub wrapped: bool,
}

/// Move `cursor` up to `travel` meters toward its target coordinate.
///
/// Never overshoots: if the target is within reach the cursor lands exactly
/// on it and the leftover distance is dropped. A zero-length segment always
/// counts as reached.
pub fn advance(cursor: &PlaybackCursor, coordinates: &[Coordinate], travel: f64) -> Step {
    let target = coordinates[cursor.segment_index];
    let remaining = cursor.position.distance_to(&target);

    if travel >= remaining {
        let reached = cursor.segment_index;
        let wrapped = reached + 1 >= coordinates.len();
        let segment_index = if wrapped { 0 } else { reached + 1 };

        return Step {
            cursor: PlaybackCursor {
                segment_index,
                position: target,
                distance_into_segment: 0.0,
            },
            reached: Some(reached),
            wrapped,
        };
    }

    Step {
        cursor: PlaybackCursor {
            segment_index: cursor.segment_index,
            position: cursor.position.interpolate(target, travel / remaining),
            distance_into_segment: cursor.distance_into_segment + travel,
        },
        reached: None,
        wrapped: false,
    }
}

/// Frame-driven playback of a route
///
/// The engine never schedules anything itself. A driver asks
/// [`frame_requested`](Self::frame_requested), waits for the next clock tick
/// and hands its timestamp to [`on_frame`](Self::on_frame). At most one frame
/// is outstanding at a time.
pub struct PlaybackEngine {
    routes: RouteWatch,
    route: Option<Arc<Route>>,
    speed: SpeedController,
    dispatcher: InstructionDispatcher,
    state: PlaybackState,
    cursor: Option<PlaybackCursor>,
    /// Timestamp (ms) of the previous frame; None until the first frame after start/resume
    baseline: Option<f64>,
    frame_requested: bool,
    passes: u64,
    render: Box<dyn RenderSink>,
    narration: Box<dyn NarrationSink>,
}

impl PlaybackEngine {
    pub fn new(
        buffer: &RouteBuffer,
        speed: SpeedController,
        render: Box<dyn RenderSink>,
        narration: Box<dyn NarrationSink>,
    ) -> Self {
        let routes = buffer.subscribe();
        let route = routes.borrow().clone();

        Self {
            routes,
            route,
            speed,
            dispatcher: InstructionDispatcher::new(),
            state: PlaybackState::Idle,
            cursor: None,
            baseline: None,
            frame_requested: false,
            passes: 0,
            render,
            narration,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Option<&PlaybackCursor> {
        self.cursor.as_ref()
    }

    /// Whether the driver should deliver another clock tick
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Completed passes since the last start
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Index of the next instruction to narrate in this pass
    pub fn trigger_pointer(&self) -> usize {
        self.dispatcher.pointer()
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    /// Speed changes take effect on the next frame
    pub fn speed_mut(&mut self) -> &mut SpeedController {
        &mut self.speed
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            cursor: self.cursor,
            speed_kmh: self.speed.speed_kmh(),
            passes: self.passes,
            route_len: self.route.as_ref().map(|r| r.len()),
        }
    }

    /// Begin a new run from the first coordinate
    ///
    /// Legal from any state; a running or paused playback restarts.
    pub fn start(&mut self) -> PlaybackResult<()> {
        self.sync_route();
        let route = self.route.clone().ok_or(PlaybackError::NoRoute)?;

        let cursor = PlaybackCursor::at_start(&route);
        self.cursor = Some(cursor);
        self.dispatcher.reset();
        self.baseline = None;
        self.passes = 0;
        self.state = PlaybackState::Running;
        self.frame_requested = true;

        info!("Playback started at {}", self.speed.display());
        self.render.set_position(cursor.position);
        Ok(())
    }

    /// Freeze the cursor; a frame already requested will still arrive once
    pub fn pause(&mut self) -> PlaybackResult<()> {
        if self.state != PlaybackState::Running {
            return Err(PlaybackError::InvalidTransition {
                operation: "pause",
                state: self.state,
            });
        }

        self.state = PlaybackState::Paused;
        info!("Playback paused");
        Ok(())
    }

    /// Continue from where pause() left off
    pub fn resume(&mut self) -> PlaybackResult<()> {
        if self.sync_route() {
            return Err(PlaybackError::RouteReplaced);
        }
        if self.state != PlaybackState::Paused {
            return Err(PlaybackError::InvalidTransition {
                operation: "resume",
                state: self.state,
            });
        }

        self.state = PlaybackState::Running;
        // Time spent paused must not turn into distance
        self.baseline = None;
        self.frame_requested = true;
        info!("Playback resumed");
        Ok(())
    }

    /// Drop the cursor and return to Idle
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            info!("Playback stopped");
        }
        self.reset();
    }

    /// Advance playback to `timestamp` (milliseconds, monotonic)
    pub fn on_frame(&mut self, timestamp: f64) {
        // This call answers the outstanding request
        self.frame_requested = false;
        self.sync_route();

        if self.state != PlaybackState::Running {
            trace!("Frame at {:.1} ignored while {:?}", timestamp, self.state);
            return;
        }

        let (Some(route), Some(cursor)) = (self.route.clone(), self.cursor) else {
            warn!("Running without a route or cursor, stopping");
            self.reset();
            return;
        };

        let Some(baseline) = self.baseline.replace(timestamp) else {
            self.frame_requested = true;
            return;
        };

        let delta_seconds = ((timestamp - baseline) / 1000.0).max(0.0);
        let travel = self.speed.current_rate() * delta_seconds;
        let step = advance(&cursor, route.coordinates(), travel);
        self.cursor = Some(step.cursor);

        if let Some(reached) = step.reached {
            trace!("Reached point {}", reached);
            for trigger in self.dispatcher.check_triggers(route.triggers(), reached) {
                debug!("Instruction at point {}: {}", trigger.index, trigger.text);
                self.narration.narrate(&trigger.text);
            }

            if step.wrapped {
                self.dispatcher.reset();
                self.passes += 1;
                debug!("Pass {} complete, looping to the start", self.passes);
            }
        }

        self.render.set_position(step.cursor.position);
        self.frame_requested = true;
    }

    /// Pick up a replaced route; any cursor on the old route is dropped.
    /// Returns true when a cursor was dropped.
    fn sync_route(&mut self) -> bool {
        // Err means the buffer is gone; keep playing the route we have
        if !matches!(self.routes.has_changed(), Ok(true)) {
            return false;
        }

        self.route = self.routes.borrow_and_update().clone();
        if self.cursor.is_none() {
            return false;
        }
        info!("Route replaced during playback, stopping");
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.cursor = None;
        self.dispatcher.reset();
        self.baseline = None;
        self.frame_requested = false;
    }
}
