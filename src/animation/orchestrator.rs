//! Transition orchestration
//!
//! The orchestrator interprets [`TransitionSequence`]s against a
//! [`PresentationSurface`] one display frame at a time. It owns the two
//! ordering rules every visual state change relies on:
//!
//! - hide-then-reveal: the hide's last frame is written and the state
//!   mutation committed before the reveal's first frame
//! - last-writer-wins: starting a sequence cancels every in-flight sequence
//!   whose target set overlaps it
//!
//! Cancelling leaves targets at their last written values. Snapping to the
//! end is only done on request ([`Orchestrator::cancel_and_finish`]).

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use super::timeline::{Step, TransitionSequence};
use crate::core::errors::EngineError;
use crate::rendering::document::{PresentationSurface, StyleFrame, StyleProperty, SurfaceError, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceHandle(u64);

impl fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The view a sequence belongs to, so it can be cancelled on unmount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    Running,
    Completed,
    Cancelled,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    /// The hide half finished and the state mutation ran
    Committed(SequenceHandle),
    Completed(SequenceHandle),
    Abandoned {
        handle: SequenceHandle,
        error: EngineError,
    },
}

/// State mutation run between the hide and the reveal
pub type Commit<C> = Box<dyn FnOnce(&mut C) + Send + Sync>;

enum Phase<C> {
    Single,
    Hiding {
        commit: Option<Commit<C>>,
        reveal: TransitionSequence,
    },
    Revealing,
}

#[derive(Default)]
struct StepRun {
    /// Start values per mounted target, captured when the step begins
    from: Option<HashMap<TargetId, Vec<(StyleProperty, f64)>>>,
    done: bool,
}

enum Outcome {
    Running,
    Completed,
    Abandoned(EngineError),
}

struct ActiveSequence<C> {
    handle: SequenceHandle,
    owner: ViewId,
    targets: BTreeSet<TargetId>,
    timeline: TransitionSequence,
    runs: Vec<StepRun>,
    origin: Option<Duration>,
    phase: Phase<C>,
}

impl<C> ActiveSequence<C> {
    fn load(&mut self, timeline: TransitionSequence, origin: Option<Duration>) {
        self.runs = timeline.steps().iter().map(|_| StepRun::default()).collect();
        self.timeline = timeline;
        self.origin = origin;
    }

    fn advance<S>(
        &mut self,
        now: Duration,
        surface: &mut S,
        ctx: &mut C,
        events: &mut Vec<SequenceEvent>,
    ) -> Outcome
    where
        S: PresentationSurface + ?Sized,
    {
        loop {
            let origin = *self.origin.get_or_insert(now);
            let elapsed = now.saturating_sub(origin);

            if let Err(error) = self.write_frames(elapsed, surface) {
                return Outcome::Abandoned(error);
            }
            if !self.runs.iter().all(|run| run.done) {
                return Outcome::Running;
            }

            match std::mem::replace(&mut self.phase, Phase::Revealing) {
                Phase::Hiding { commit, reveal } => {
                    if let Some(commit) = commit {
                        commit(ctx);
                    }
                    events.push(SequenceEvent::Committed(self.handle));
                    debug!("Sequence {} committed, starting reveal", self.handle);
                    // The reveal's clock starts at the instant the hide ended
                    self.load(reveal, Some(now));
                }
                Phase::Single | Phase::Revealing => return Outcome::Completed,
            }
        }
    }

    fn write_frames<S>(&mut self, elapsed: Duration, surface: &mut S) -> Result<(), EngineError>
    where
        S: PresentationSurface + ?Sized,
    {
        for (scheduled, run) in self.timeline.steps().iter().zip(self.runs.iter_mut()) {
            if run.done {
                continue;
            }
            let Some(progress) = scheduled.progress(elapsed) else {
                continue;
            };
            let step = &scheduled.step;
            if run.from.is_none() {
                run.from = Some(capture_start_values(step, &*surface)?);
            }
            let Some(from) = run.from.as_ref() else {
                continue;
            };

            let eased = step.easing.apply(progress);
            for (target, starts) in from {
                let values = starts
                    .iter()
                    .zip(&step.properties)
                    .map(|((property, start), (_, end))| (*property, start + (end - start) * eased))
                    .collect();
                write_frame(surface, target, &StyleFrame::new(values))?;
            }
            if progress >= 1.0 {
                run.done = true;
            }
        }
        Ok(())
    }

    /// Write the end values of every remaining step
    fn write_final<S>(&mut self, surface: &mut S) -> Result<(), EngineError>
    where
        S: PresentationSurface + ?Sized,
    {
        for (scheduled, run) in self.timeline.steps().iter().zip(self.runs.iter_mut()) {
            if run.done {
                continue;
            }
            let frame = StyleFrame::new(scheduled.step.properties.clone());
            for target in &scheduled.step.targets {
                write_frame(surface, target, &frame)?;
            }
            run.done = true;
        }
        Ok(())
    }
}

fn capture_start_values<S>(
    step: &Step,
    surface: &S,
) -> Result<HashMap<TargetId, Vec<(StyleProperty, f64)>>, EngineError>
where
    S: PresentationSurface + ?Sized,
{
    let mut from = HashMap::new();
    'targets: for target in &step.targets {
        let mut starts = Vec::with_capacity(step.properties.len());
        for (property, _) in &step.properties {
            match surface.read_style(target, *property) {
                Ok(value) => starts.push((*property, value)),
                Err(SurfaceError::MissingTarget(_)) => continue 'targets,
                Err(error) => return Err(error.into()),
            }
        }
        from.insert(target.clone(), starts);
    }
    Ok(from)
}

/// Missing targets are an expected transient state and are skipped silently
fn write_frame<S>(surface: &mut S, target: &TargetId, frame: &StyleFrame) -> Result<(), EngineError>
where
    S: PresentationSurface + ?Sized,
{
    match surface.apply_style(target, frame) {
        Ok(()) | Err(SurfaceError::MissingTarget(_)) => Ok(()),
        Err(error) => Err(error.into()),
    }
}

/// Schedules and runs transition sequences. `C` is the state that
/// hide-then-reveal commits mutate.
pub struct Orchestrator<C> {
    next_handle: u64,
    active: Vec<ActiveSequence<C>>,
    /// Outcomes of the most recently finished sequences, oldest first
    finished: VecDeque<(SequenceHandle, SequenceStatus)>,
}

/// How many finished sequences [`Orchestrator::status`] still remembers
pub const FINISHED_HISTORY: usize = 64;

fn record(
    finished: &mut VecDeque<(SequenceHandle, SequenceStatus)>,
    handle: SequenceHandle,
    status: SequenceStatus,
) {
    if finished.len() == FINISHED_HISTORY {
        finished.pop_front();
    }
    finished.push_back((handle, status));
}

impl<C> Default for Orchestrator<C> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            active: Vec::new(),
            finished: VecDeque::new(),
        }
    }
}

impl<C> Orchestrator<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sequence. It starts on the next [`advance`](Self::advance).
    pub fn sequence(&mut self, owner: ViewId, steps: Vec<Step>) -> SequenceHandle {
        let timeline = TransitionSequence::new(steps);
        let targets = timeline.targets();
        self.insert(owner, targets, timeline, Phase::Single)
    }

    /// Hide, then run `commit`, then reveal.
    ///
    /// The reveal shares the handle: cancelling during the hide cancels the
    /// reveal and the commit never runs.
    pub fn hide_then_reveal(
        &mut self,
        owner: ViewId,
        hide: Vec<Step>,
        commit: Commit<C>,
        reveal: Vec<Step>,
    ) -> SequenceHandle {
        let hide = TransitionSequence::new(hide);
        let reveal = TransitionSequence::new(reveal);
        let mut targets = hide.targets();
        targets.extend(reveal.targets());
        let phase = Phase::Hiding {
            commit: Some(commit),
            reveal,
        };
        self.insert(owner, targets, hide, phase)
    }

    fn insert(
        &mut self,
        owner: ViewId,
        targets: BTreeSet<TargetId>,
        timeline: TransitionSequence,
        phase: Phase<C>,
    ) -> SequenceHandle {
        let superseded: Vec<SequenceHandle> = self
            .active
            .iter()
            .filter(|active| !active.targets.is_disjoint(&targets))
            .map(|active| active.handle)
            .collect();
        for handle in superseded {
            debug!("Sequence {} superseded", handle);
            self.cancel(handle);
        }

        self.next_handle += 1;
        let handle = SequenceHandle(self.next_handle);
        let mut active = ActiveSequence {
            handle,
            owner,
            targets,
            timeline: TransitionSequence::default(),
            runs: Vec::new(),
            origin: None,
            phase,
        };
        active.load(timeline, None);
        self.active.push(active);
        handle
    }

    /// Run one display frame at monotonic time `now`
    pub fn advance<S>(&mut self, now: Duration, surface: &mut S, ctx: &mut C) -> Vec<SequenceEvent>
    where
        S: PresentationSurface + ?Sized,
    {
        let mut events = Vec::new();
        let finished = &mut self.finished;
        self.active.retain_mut(|active| {
            match active.advance(now, surface, ctx, &mut events) {
                Outcome::Running => true,
                Outcome::Completed => {
                    debug!("Sequence {} completed", active.handle);
                    record(finished, active.handle, SequenceStatus::Completed);
                    events.push(SequenceEvent::Completed(active.handle));
                    false
                }
                Outcome::Abandoned(error) => {
                    warn!("Abandoning sequence {}: {}", active.handle, error);
                    record(finished, active.handle, SequenceStatus::Abandoned);
                    events.push(SequenceEvent::Abandoned {
                        handle: active.handle,
                        error,
                    });
                    false
                }
            }
        });
        events
    }

    /// Halt a sequence where it is. Returns false if it was not running.
    pub fn cancel(&mut self, handle: SequenceHandle) -> bool {
        let Some(index) = self.active.iter().position(|a| a.handle == handle) else {
            return false;
        };
        self.active.remove(index);
        record(&mut self.finished, handle, SequenceStatus::Cancelled);
        debug!("Sequence {} cancelled", handle);
        true
    }

    /// Stop a sequence by jumping it to its end: remaining steps are written
    /// at their final values and a pending commit runs before the reveal.
    pub fn cancel_and_finish<S>(&mut self, handle: SequenceHandle, surface: &mut S, ctx: &mut C) -> bool
    where
        S: PresentationSurface + ?Sized,
    {
        let Some(index) = self.active.iter().position(|a| a.handle == handle) else {
            return false;
        };
        let mut active = self.active.remove(index);

        let result = active.write_final(surface).and_then(|()| {
            if let Phase::Hiding { commit, reveal } = std::mem::replace(&mut active.phase, Phase::Revealing) {
                if let Some(commit) = commit {
                    commit(ctx);
                }
                active.load(reveal, None);
                active.write_final(surface)?;
            }
            Ok(())
        });

        let status = match result {
            Ok(()) => SequenceStatus::Completed,
            Err(error) => {
                warn!("Sequence {} could not be finished: {}", handle, error);
                SequenceStatus::Abandoned
            }
        };
        record(&mut self.finished, handle, status);
        true
    }

    /// Cancel every sequence started on behalf of `owner`
    pub fn cancel_owned_by(&mut self, owner: ViewId) -> usize {
        let owned: Vec<SequenceHandle> = self
            .active
            .iter()
            .filter(|a| a.owner == owner)
            .map(|a| a.handle)
            .collect();
        for handle in &owned {
            self.cancel(*handle);
        }
        owned.len()
    }

    /// Cancel everything. Safe to call repeatedly.
    pub fn teardown(&mut self) -> usize {
        let handles: Vec<SequenceHandle> = self.active.iter().map(|a| a.handle).collect();
        for handle in &handles {
            self.cancel(*handle);
        }
        handles.len()
    }

    /// `None` for unknown handles and for finished sequences that have
    /// aged out of the history.
    pub fn status(&self, handle: SequenceHandle) -> Option<SequenceStatus> {
        if self.active.iter().any(|a| a.handle == handle) {
            return Some(SequenceStatus::Running);
        }
        self.finished
            .iter()
            .rev()
            .find(|(finished, _)| *finished == handle)
            .map(|(_, status)| *status)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::easing::Easing;
    use crate::rendering::document::{ElementStyle, Placement, SceneDocument};
    use std::sync::{Arc, Mutex};

    const FRAME: Duration = Duration::from_millis(16);
    const VIEW: ViewId = ViewId("home");

    type Log = Arc<Mutex<Vec<String>>>;

    /// Surface recording every write into a log shared with commits
    struct LoggingSurface {
        document: SceneDocument,
        log: Log,
    }

    impl LoggingSurface {
        fn new(log: Log) -> Self {
            let mut document = SceneDocument::default();
            document.mount("orbit", ElementStyle::default());
            document.mount("logo", ElementStyle::hidden());
            document.mount("grid", ElementStyle::default());
            Self { document, log }
        }

        fn opacity(&self, target: &str) -> f64 {
            self.document.style(&TargetId::from(target)).unwrap().opacity
        }
    }

    impl PresentationSurface for LoggingSurface {
        fn read_style(&self, target: &TargetId, property: StyleProperty) -> Result<f64, SurfaceError> {
            self.document.read_style(target, property)
        }

        fn apply_style(&mut self, target: &TargetId, frame: &StyleFrame) -> Result<(), SurfaceError> {
            self.document.apply_style(target, frame)?;
            let opacity = frame.get(StyleProperty::Opacity).unwrap_or(f64::NAN);
            self.log.lock().unwrap().push(format!("{target}:{opacity:.3}"));
            Ok(())
        }

        fn place(&mut self, target: &TargetId, placement: Placement) -> Result<(), SurfaceError> {
            self.document.place(target, placement)
        }
    }

    fn fade(target: &str, to: f64) -> Step {
        Step::to([target])
            .set(StyleProperty::Opacity, to)
            .millis(300)
            .ease(Easing::Linear)
    }

    fn commit_marker() -> Commit<Log> {
        Box::new(|log: &mut Log| log.lock().unwrap().push("commit".to_string()))
    }

    fn run_frames(
        orchestrator: &mut Orchestrator<Log>,
        surface: &mut LoggingSurface,
        ctx: &mut Log,
        frames: u32,
    ) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        for frame in 0..frames {
            events.extend(orchestrator.advance(FRAME * frame, surface, ctx));
        }
        events
    }

    #[test]
    fn hide_completes_and_commits_before_reveal_starts() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let handle = orchestrator.hide_then_reveal(
            VIEW,
            vec![fade("orbit", 0.0)],
            commit_marker(),
            vec![fade("logo", 1.0)],
        );
        let events = run_frames(&mut orchestrator, &mut surface, &mut ctx, 60);

        let entries = log.lock().unwrap().clone();
        let commit_at = entries.iter().position(|e| e == "commit").unwrap();
        assert_eq!(entries[commit_at - 1], "orbit:0.000");
        assert!(entries[..commit_at].iter().all(|e| e.starts_with("orbit")));
        assert!(entries[commit_at + 1..].iter().all(|e| e.starts_with("logo")));

        assert_eq!(
            events,
            vec![SequenceEvent::Committed(handle), SequenceEvent::Completed(handle)]
        );
        assert_eq!(orchestrator.status(handle), Some(SequenceStatus::Completed));
        assert_eq!(surface.opacity("orbit"), 0.0);
        assert_eq!(surface.opacity("logo"), 1.0);
    }

    #[test]
    fn cancelling_the_hide_cancels_the_reveal() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let handle = orchestrator.hide_then_reveal(
            VIEW,
            vec![fade("orbit", 0.0)],
            commit_marker(),
            vec![fade("logo", 1.0)],
        );
        run_frames(&mut orchestrator, &mut surface, &mut ctx, 10);
        assert!(orchestrator.cancel(handle));
        assert!(!orchestrator.cancel(handle));

        let events = run_frames(&mut orchestrator, &mut surface, &mut ctx, 60);
        assert!(events.is_empty());
        let entries = log.lock().unwrap().clone();
        assert!(!entries.iter().any(|e| e == "commit" || e.starts_with("logo")));

        // Left mid-fade, not snapped
        let orbit = surface.opacity("orbit");
        assert!(orbit > 0.0 && orbit < 1.0, "{orbit}");
        assert_eq!(orchestrator.status(handle), Some(SequenceStatus::Cancelled));
    }

    #[test]
    fn cancel_and_finish_snaps_and_commits() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let handle = orchestrator.hide_then_reveal(
            VIEW,
            vec![fade("orbit", 0.0)],
            commit_marker(),
            vec![fade("logo", 1.0)],
        );
        run_frames(&mut orchestrator, &mut surface, &mut ctx, 3);
        assert!(orchestrator.cancel_and_finish(handle, &mut surface, &mut ctx));

        assert_eq!(surface.opacity("orbit"), 0.0);
        assert_eq!(surface.opacity("logo"), 1.0);
        assert!(log.lock().unwrap().iter().any(|e| e == "commit"));
        assert_eq!(orchestrator.status(handle), Some(SequenceStatus::Completed));
        assert!(orchestrator.is_idle());
    }

    #[test]
    fn overlapping_targets_supersede_earlier_sequences() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let first = orchestrator.sequence(VIEW, vec![fade("orbit", 0.0)]);
        let unrelated = orchestrator.sequence(VIEW, vec![fade("grid", 0.0)]);
        run_frames(&mut orchestrator, &mut surface, &mut ctx, 5);

        let second = orchestrator.sequence(VIEW, vec![fade("orbit", 1.0), fade("logo", 1.0)]);
        assert_eq!(orchestrator.status(first), Some(SequenceStatus::Cancelled));
        assert_eq!(orchestrator.status(unrelated), Some(SequenceStatus::Running));
        assert_eq!(orchestrator.status(second), Some(SequenceStatus::Running));
        assert_eq!(orchestrator.active_count(), 2);
    }

    #[test]
    fn reveal_starts_from_values_captured_after_commit() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        orchestrator.hide_then_reveal(
            VIEW,
            vec![fade("orbit", 0.0).millis(0)],
            commit_marker(),
            vec![fade("orbit", 1.0)],
        );
        orchestrator.advance(Duration::ZERO, &mut surface, &mut ctx);
        assert_eq!(surface.opacity("orbit"), 0.0);

        orchestrator.advance(Duration::from_millis(150), &mut surface, &mut ctx);
        assert!((surface.opacity("orbit") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_targets_are_skipped_silently() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let handle = orchestrator.sequence(
            VIEW,
            vec![Step::to(["orbit", "menu"]).set(StyleProperty::Opacity, 0.0).millis(100)],
        );
        let events = run_frames(&mut orchestrator, &mut surface, &mut ctx, 20);
        assert_eq!(events, vec![SequenceEvent::Completed(handle)]);
        assert_eq!(surface.opacity("orbit"), 0.0);
    }

    #[test]
    fn rejected_frames_abandon_only_their_sequence() {
        let log: Log = Arc::default();
        let mut ctx = log.clone();
        let mut surface = LoggingSurface::new(log.clone());
        let mut orchestrator = Orchestrator::new();

        let broken = orchestrator.sequence(
            VIEW,
            vec![Step::to(["grid"]).set(StyleProperty::Blur, f64::NAN)],
        );
        let healthy = orchestrator.sequence(VIEW, vec![fade("orbit", 0.0)]);

        let events = run_frames(&mut orchestrator, &mut surface, &mut ctx, 30);
        assert!(matches!(
            events.first(),
            Some(SequenceEvent::Abandoned { handle, error: EngineError::AnimationFailure { .. } })
                if *handle == broken
        ));
        assert!(events.contains(&SequenceEvent::Completed(healthy)));
        assert_eq!(orchestrator.status(broken), Some(SequenceStatus::Abandoned));
    }

    #[test]
    fn teardown_cancels_by_owner_and_is_idempotent() {
        let mut orchestrator: Orchestrator<Log> = Orchestrator::new();
        let home = orchestrator.sequence(VIEW, vec![fade("orbit", 0.0)]);
        let menu = orchestrator.sequence(ViewId("menu"), vec![fade("grid", 0.0)]);

        assert_eq!(orchestrator.cancel_owned_by(ViewId("menu")), 1);
        assert_eq!(orchestrator.status(menu), Some(SequenceStatus::Cancelled));
        assert_eq!(orchestrator.status(home), Some(SequenceStatus::Running));

        assert_eq!(orchestrator.teardown(), 1);
        assert_eq!(orchestrator.teardown(), 0);
        assert!(orchestrator.is_idle());
    }

    #[test]
    fn finished_history_is_bounded() {
        let log: Log = Arc::default();
        let mut surface = LoggingSurface::new(log.clone());
        let mut ctx = log.clone();
        let mut orchestrator = Orchestrator::new();

        let first = orchestrator.sequence(VIEW, vec![fade("grid", 0.5)]);
        assert_eq!(orchestrator.status(first), Some(SequenceStatus::Running));
        let mut last = first;
        for _ in 0..=FINISHED_HISTORY {
            // Each new sequence on the same target supersedes the previous one
            last = orchestrator.sequence(VIEW, vec![fade("grid", 0.5)]);
        }
        assert_eq!(orchestrator.finished.len(), FINISHED_HISTORY);
        assert_eq!(orchestrator.status(first), None);

        orchestrator.cancel_and_finish(last, &mut surface, &mut ctx);
        assert_eq!(orchestrator.finished.len(), FINISHED_HISTORY);
        assert_eq!(orchestrator.status(last), Some(SequenceStatus::Completed));
    }
}
