//! The comparison view: owns the state, drives the host elements, and turns
//! pointer, media and execution events into state transitions.

use std::rc::Rc;

use crate::{
    foundation::{
        core::{ContainerSize, PointerPos},
        error::{CompareError, CompareResult},
    },
    handles::{PAUSE_LABEL, PLAY_LABEL, ViewHandles},
    layout::{CursorHint, LayoutDescriptor, derive_layout_with},
    media::{LoadTracker, MediaEvent, MediaLayer, PlaybackSync},
    message::ExecutionMessage,
    opts::ViewOpts,
    state::{ComparisonMode, ComparisonState, LoadRequest, SliderDirection},
    telemetry::{Level, Telemetry, TracingTelemetry},
};

pub const STATUS_IDLE: &str = "Load videos to begin comparison";
pub const STATUS_LOADING: &str = "Loading videos...";
pub const STATUS_LOADED: &str = "Videos loaded - Click play to start";
pub const STATUS_LOADED_COMBINED: &str = "Side-by-side video loaded - Click play to start";
pub const STATUS_PLAYING: &str = "Playing synchronized videos";
pub const STATUS_PLAYING_COMBINED: &str = "Playing side-by-side video";
pub const STATUS_PAUSED: &str = "Videos paused";
pub const STATUS_PLAY_ERROR: &str = "Error playing videos";
pub const STATUS_PLAY_ERROR_COMBINED: &str = "Error playing video";
pub const STATUS_ERROR_A: &str = "Error loading Video A";
pub const STATUS_ERROR_B: &str = "Error loading Video B";
pub const STATUS_ERROR_COMBINED: &str = "Error loading side-by-side video";

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging,
}

pub struct ComparisonView {
    state: ComparisonState,
    handles: Option<ViewHandles>,
    opts: ViewOpts,
    sync: PlaybackSync,
    loads: LoadTracker,
    drag: DragState,
    status: String,
    telemetry: Rc<dyn Telemetry>,
}

impl ComparisonView {
    /// A view with default options that logs through `tracing`.
    pub fn new() -> Self {
        Self::with_opts(ViewOpts::default(), Rc::new(TracingTelemetry))
    }

    pub fn with_opts(opts: ViewOpts, telemetry: Rc<dyn Telemetry>) -> Self {
        Self {
            state: ComparisonState::default(),
            handles: None,
            sync: PlaybackSync::new(opts.sync_tolerance_secs),
            opts,
            loads: LoadTracker::default(),
            drag: DragState::Idle,
            status: STATUS_IDLE.to_string(),
            telemetry,
        }
    }

    /// Hand the view its visual elements and paint the initial frame.
    pub fn attach(&mut self, mut handles: ViewHandles) {
        handles.surface.set_size(self.opts.widget_size);
        handles.surface.set_status(&self.status);
        handles.surface.set_play_label(PLAY_LABEL);
        self.handles = Some(handles);
        self.telemetry.emit(Level::Debug, "view.attached", &[]);
        self.refresh();
    }

    pub fn is_attached(&self) -> bool {
        self.handles.is_some()
    }

    pub fn state(&self) -> &ComparisonState {
        &self.state
    }

    pub fn opts(&self) -> &ViewOpts {
        &self.opts
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    /// Current layout, including the transient drag cursor.
    pub fn layout(&self) -> LayoutDescriptor {
        let mut layout = derive_layout_with(&self.state, &self.opts.handle);
        if self.is_dragging() && layout.handle.is_some() {
            layout.cursor = CursorHint::Grabbing;
        }
        layout
    }

    /// Replace sources, mode and direction and start loading the new media.
    ///
    /// Fails without touching any state when no elements are attached.
    #[tracing::instrument(skip(self))]
    pub fn load_media(&mut self, req: LoadRequest) -> CompareResult<()> {
        let Some(handles) = self.handles.as_mut() else {
            self.telemetry.emit(
                Level::Error,
                "media.missing_elements",
                &[("operation", "load_media".to_string())],
            );
            return Err(CompareError::missing_elements(
                "load_media called before view handles were attached",
            ));
        };

        self.state.load_media(req);
        self.loads.reset();
        if !self.state.is_interactive() {
            self.drag = DragState::Idle;
        }

        handles.video_a.set_source("");
        handles.video_b.set_source("");

        let source_a = self.state.source_a().map(|m| m.as_str()).unwrap_or_default();
        let source_b = self.state.source_b().map(|m| m.as_str()).unwrap_or_default();
        handles.video_a.set_source(source_a);
        handles.video_a.load();
        if self.state.mode() == ComparisonMode::Slider {
            handles.video_b.set_source(source_b);
            handles.video_b.load();
        }

        self.telemetry.emit(
            Level::Info,
            "media.load",
            &[
                ("source_a", source_a.to_string()),
                ("source_b", source_b.to_string()),
                ("mode", self.state.mode().to_string()),
                ("direction", self.state.direction().to_string()),
            ],
        );
        self.set_status(STATUS_LOADING);
        self.refresh();
        Ok(())
    }

    /// Handle an execution result. Returns `Ok(false)` when the message did
    /// not carry both URLs and was ignored.
    #[tracing::instrument(skip(self, message))]
    pub fn on_executed(&mut self, message: &ExecutionMessage) -> CompareResult<bool> {
        let Some(parsed) = message.to_load_request() else {
            self.telemetry.emit(Level::Debug, "message.incomplete", &[]);
            return Ok(false);
        };
        for warning in &parsed.warnings {
            self.telemetry.emit(
                Level::Warn,
                "message.fallback",
                &[("reason", warning.to_string())],
            );
        }
        self.load_media(parsed.request)?;
        Ok(true)
    }

    pub fn set_mode(&mut self, mode: ComparisonMode) {
        if mode != ComparisonMode::Slider {
            self.drag = DragState::Idle;
        }
        self.state.set_mode(mode);
        self.telemetry
            .emit(Level::Debug, "mode.change", &[("mode", mode.to_string())]);
        self.refresh();
    }

    pub fn set_direction(&mut self, direction: SliderDirection) {
        self.state.set_direction(direction);
        self.telemetry.emit(
            Level::Debug,
            "direction.change",
            &[("direction", direction.to_string())],
        );
        self.refresh();
    }

    /// Move the split to follow a pointer. No-op outside slider mode.
    pub fn set_split_from_pointer(&mut self, pos: PointerPos, container: ContainerSize) -> bool {
        if !self.state.set_split_from_pointer(pos, container) {
            return false;
        }
        self.telemetry.emit(
            Level::Debug,
            "split.update",
            &[
                ("direction", self.state.direction().to_string()),
                ("split", format!("{:.3}", self.state.split())),
            ],
        );
        self.refresh();
        true
    }

    /// Begin a drag. Ignored unless the view is in slider mode.
    pub fn pointer_down(&mut self, pos: PointerPos, container: ContainerSize) -> bool {
        if !self.state.is_interactive() {
            return false;
        }
        self.drag = DragState::Dragging;
        self.telemetry.emit(Level::Debug, "drag.begin", &[]);
        if !self.set_split_from_pointer(pos, container) {
            self.refresh();
        }
        true
    }

    pub fn pointer_move(&mut self, pos: PointerPos, container: ContainerSize) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.set_split_from_pointer(pos, container)
    }

    /// End a drag and repaint with the resting cursor.
    pub fn pointer_up(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.drag = DragState::Idle;
        self.telemetry.emit(
            Level::Debug,
            "drag.end",
            &[("split", format!("{:.3}", self.state.split()))],
        );
        self.refresh();
        true
    }

    /// React to a notification from one of the media elements.
    ///
    /// Load errors are shown in the status text and returned; the comparison
    /// state is never changed by media events.
    pub fn on_media_event(&mut self, layer: MediaLayer, event: &MediaEvent) -> CompareResult<()> {
        let side_by_side = self.state.mode() == ComparisonMode::SideBySide;
        match event {
            MediaEvent::LoadStart => self.loads.set(layer, false),
            MediaEvent::Loaded => {
                self.loads.set(layer, true);
                self.telemetry
                    .emit(Level::Debug, "media.loaded", &[("layer", layer.to_string())]);
                if side_by_side && self.loads.is_loaded(MediaLayer::A) {
                    self.set_status(STATUS_LOADED_COMBINED);
                } else if !side_by_side && self.loads.both() {
                    self.set_status(STATUS_LOADED);
                }
            }
            MediaEvent::Error { detail } => {
                self.telemetry.emit(
                    Level::Error,
                    "media.error",
                    &[("layer", layer.to_string()), ("detail", detail.clone())],
                );
                match (layer, side_by_side) {
                    (MediaLayer::A, true) => self.set_status(STATUS_ERROR_COMBINED),
                    (MediaLayer::A, false) => self.set_status(STATUS_ERROR_A),
                    (MediaLayer::B, false) => self.set_status(STATUS_ERROR_B),
                    (MediaLayer::B, true) => {}
                }
                return Err(CompareError::media_load(layer, detail.clone()));
            }
            MediaEvent::TimeUpdate => {
                if layer == MediaLayer::A && !side_by_side {
                    self.sync_playback();
                }
            }
        }
        Ok(())
    }

    /// Play when paused, pause otherwise.
    pub fn toggle_playback(&mut self) -> CompareResult<()> {
        let side_by_side = self.state.mode() == ComparisonMode::SideBySide;
        let handles = self
            .handles
            .as_mut()
            .ok_or_else(|| CompareError::missing_elements("toggle_playback without handles"))?;

        if !handles.video_a.is_paused() {
            handles.video_a.pause();
            if !side_by_side {
                handles.video_b.pause();
            }
            handles.surface.set_play_label(PLAY_LABEL);
            self.telemetry.emit(Level::Debug, "playback.pause", &[]);
            self.set_status(STATUS_PAUSED);
            return Ok(());
        }

        let played = if side_by_side {
            handles.video_a.play()
        } else {
            handles.video_a.play().and_then(|()| handles.video_b.play())
        };
        match played {
            Ok(()) => {
                handles.surface.set_play_label(PAUSE_LABEL);
                self.telemetry.emit(Level::Debug, "playback.play", &[]);
                self.set_status(if side_by_side {
                    STATUS_PLAYING_COMBINED
                } else {
                    STATUS_PLAYING
                });
                Ok(())
            }
            Err(err) => {
                self.telemetry
                    .emit(Level::Error, "playback.error", &[("detail", err.to_string())]);
                self.set_status(if side_by_side {
                    STATUS_PLAY_ERROR_COMBINED
                } else {
                    STATUS_PLAY_ERROR
                });
                Err(err)
            }
        }
    }

    fn sync_playback(&mut self) {
        let Some(handles) = self.handles.as_mut() else {
            return;
        };
        if let Some(drift) = self.sync.align(&*handles.video_a, &mut *handles.video_b) {
            self.telemetry.emit(
                Level::Debug,
                "playback.sync",
                &[("drift_secs", format!("{drift:.3}"))],
            );
        }
    }

    fn set_status(&mut self, text: &str) {
        text.clone_into(&mut self.status);
        if let Some(handles) = self.handles.as_mut() {
            handles.surface.set_status(text);
        }
    }

    fn refresh(&mut self) {
        let layout = self.layout();
        if let Some(handles) = self.handles.as_mut() {
            handles.surface.apply_layout(&layout);
        }
    }
}

impl Default for ComparisonView {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComparisonView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonView")
            .field("state", &self.state)
            .field("attached", &self.handles.is_some())
            .field("drag", &self.drag)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        headless::HeadlessRig,
        media::MediaElement as _,
        state::MediaRef,
        telemetry::MemoryTelemetry,
    };

    fn attached() -> (ComparisonView, HeadlessRig, Rc<MemoryTelemetry>) {
        let telemetry = Rc::new(MemoryTelemetry::new());
        let mut view = ComparisonView::with_opts(ViewOpts::default(), telemetry.clone());
        let rig = HeadlessRig::new();
        view.attach(rig.handles());
        (view, rig, telemetry)
    }

    fn pair() -> LoadRequest {
        LoadRequest::new(MediaRef::from_url("/a.mov"), MediaRef::from_url("/b.mov"))
    }

    const BOX: ContainerSize = ContainerSize {
        width: 400.0,
        height: 200.0,
    };

    #[test]
    fn attach_paints_idle_state() {
        let (view, rig, _) = attached();
        assert!(view.is_attached());
        assert_eq!(rig.surface.size(), Some(view.opts().widget_size));
        assert_eq!(rig.surface.size(), Some([500, 420]));
        assert_eq!(rig.surface.status(), STATUS_IDLE);
        assert_eq!(rig.surface.play_label(), PLAY_LABEL);
        assert!(rig.surface.layout().unwrap().is_waiting());
        assert_eq!(view.status(), STATUS_IDLE);
    }

    #[test]
    fn load_without_handles_is_rejected_and_leaves_state() {
        let telemetry = Rc::new(MemoryTelemetry::new());
        let mut view = ComparisonView::with_opts(ViewOpts::default(), telemetry.clone());
        assert!(!view.is_attached());
        let before = view.state().clone();
        let err = view
            .load_media(pair().with_mode(ComparisonMode::SideBySide))
            .unwrap_err();
        assert!(matches!(err, CompareError::MissingMediaElements(_)));
        assert_eq!(view.state(), &before);
        assert_eq!(telemetry.count_at(Level::Error), 1);
    }

    #[test]
    fn slider_load_sets_both_sources() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();
        assert_eq!(rig.video_a.source(), "/a.mov");
        assert_eq!(rig.video_b.source(), "/b.mov");
        assert_eq!(rig.video_a.load_count(), 1);
        assert_eq!(rig.video_b.load_count(), 1);
        assert_eq!(rig.surface.status(), STATUS_LOADING);
        assert_eq!(rig.surface.layout().unwrap().indicator, "Split: 50% (horizontal)");
    }

    #[test]
    fn side_by_side_load_only_touches_a() {
        let (mut view, rig, _) = attached();
        view.load_media(pair().with_mode(ComparisonMode::SideBySide))
            .unwrap();
        assert_eq!(rig.video_a.source(), "/a.mov");
        assert_eq!(rig.video_b.source(), "");
        assert_eq!(rig.video_b.load_count(), 0);
    }

    #[test]
    fn drag_protocol_updates_split_and_cursor() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();

        assert!(!view.pointer_move(PointerPos::new(100.0, 0.0), BOX));
        assert!(view.pointer_down(PointerPos::new(100.0, 50.0), BOX));
        assert!((view.state().split() - 0.25).abs() < 1e-12);
        assert_eq!(rig.surface.layout().unwrap().cursor, CursorHint::Grabbing);

        assert!(view.pointer_move(PointerPos::new(300.0, 50.0), BOX));
        assert!((view.state().split() - 0.75).abs() < 1e-12);

        assert!(view.pointer_up());
        assert!(!view.is_dragging());
        let layout = rig.surface.layout().unwrap();
        assert_eq!(layout.cursor, CursorHint::EwResize);
        assert_eq!(layout.indicator, "Split: 75% (horizontal)");
        assert!(!view.pointer_up());
    }

    #[test]
    fn side_by_side_ignores_pointer() {
        let (mut view, _, _) = attached();
        view.load_media(pair()).unwrap();
        view.set_mode(ComparisonMode::SideBySide);
        assert!(!view.pointer_down(PointerPos::new(10.0, 10.0), BOX));
        assert!(!view.set_split_from_pointer(PointerPos::new(10.0, 10.0), BOX));
        assert_eq!(view.state().split(), 0.5);

        view.set_mode(ComparisonMode::Slider);
        assert!(view.set_split_from_pointer(PointerPos::new(40.0, 10.0), BOX));
        assert!((view.state().split() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn switching_to_side_by_side_cancels_drag() {
        let (mut view, _, _) = attached();
        view.load_media(pair()).unwrap();
        view.pointer_down(PointerPos::new(10.0, 10.0), BOX);
        view.set_mode(ComparisonMode::SideBySide);
        assert!(!view.is_dragging());
    }

    #[test]
    fn side_by_side_load_cancels_drag() {
        let (mut view, _, _) = attached();
        view.load_media(pair()).unwrap();
        assert!(view.pointer_down(PointerPos::new(40.0, 0.0), BOX));

        view.load_media(pair().with_mode(ComparisonMode::SideBySide))
            .unwrap();
        assert!(!view.is_dragging());

        view.load_media(pair()).unwrap();
        assert!(!view.pointer_move(PointerPos::new(360.0, 0.0), BOX));
        assert!((view.state().split() - 0.1).abs() < 1e-12);
        assert!(!view.pointer_up());
    }

    #[test]
    fn slider_load_keeps_an_active_drag() {
        let (mut view, _, _) = attached();
        view.load_media(pair()).unwrap();
        view.pointer_down(PointerPos::new(40.0, 0.0), BOX);
        view.load_media(pair().with_direction(SliderDirection::Vertical))
            .unwrap();
        assert!(view.is_dragging());
    }

    #[test]
    fn load_status_transitions() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();
        view.on_media_event(MediaLayer::A, &MediaEvent::Loaded).unwrap();
        assert_eq!(rig.surface.status(), STATUS_LOADING);
        view.on_media_event(MediaLayer::B, &MediaEvent::Loaded).unwrap();
        assert_eq!(rig.surface.status(), STATUS_LOADED);

        view.load_media(pair().with_mode(ComparisonMode::SideBySide))
            .unwrap();
        view.on_media_event(MediaLayer::A, &MediaEvent::LoadStart).unwrap();
        view.on_media_event(MediaLayer::A, &MediaEvent::Loaded).unwrap();
        assert_eq!(rig.surface.status(), STATUS_LOADED_COMBINED);
    }

    #[test]
    fn media_errors_surface_in_status_only() {
        let (mut view, rig, telemetry) = attached();
        view.load_media(pair().with_direction(SliderDirection::Vertical))
            .unwrap();
        view.set_split_from_pointer(PointerPos::new(0.0, 60.0), BOX);
        let before = view.state().clone();

        let err = view
            .on_media_event(
                MediaLayer::B,
                &MediaEvent::Error {
                    detail: "decode".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, CompareError::MediaLoad { layer: MediaLayer::B, .. }));
        assert_eq!(rig.surface.status(), STATUS_ERROR_B);
        assert_eq!(view.state(), &before);
        assert_eq!(telemetry.events("media.error").len(), 1);

        view.set_mode(ComparisonMode::SideBySide);
        let _ = view.on_media_event(
            MediaLayer::B,
            &MediaEvent::Error {
                detail: "late".to_string(),
            },
        );
        assert_eq!(rig.surface.status(), STATUS_ERROR_B);
        let _ = view.on_media_event(
            MediaLayer::A,
            &MediaEvent::Error {
                detail: "404".to_string(),
            },
        );
        assert_eq!(rig.surface.status(), STATUS_ERROR_COMBINED);
    }

    #[test]
    fn slider_error_on_a_names_video_a() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();
        let err = view
            .on_media_event(
                MediaLayer::A,
                &MediaEvent::Error {
                    detail: "404".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, CompareError::MediaLoad { layer: MediaLayer::A, .. }));
        assert_eq!(rig.surface.status(), STATUS_ERROR_A);
        assert_eq!(view.status(), STATUS_ERROR_A);
    }

    #[test]
    fn time_updates_resync_b_in_slider_mode_only() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();
        let mut a = rig.video_a.clone();
        let mut b = rig.video_b.clone();

        a.set_current_time(2.0);
        b.set_current_time(2.05);
        view.on_media_event(MediaLayer::A, &MediaEvent::TimeUpdate).unwrap();
        assert_eq!(b.current_time(), 2.05);

        a.set_current_time(4.0);
        view.on_media_event(MediaLayer::A, &MediaEvent::TimeUpdate).unwrap();
        assert_eq!(b.current_time(), 4.0);

        view.set_mode(ComparisonMode::SideBySide);
        a.set_current_time(9.0);
        view.on_media_event(MediaLayer::A, &MediaEvent::TimeUpdate).unwrap();
        assert_eq!(b.current_time(), 4.0);
    }

    #[test]
    fn playback_toggle_labels_and_status() {
        let (mut view, rig, _) = attached();
        view.load_media(pair()).unwrap();

        view.toggle_playback().unwrap();
        assert!(!rig.video_a.is_paused() && !rig.video_b.is_paused());
        assert_eq!(rig.surface.play_label(), PAUSE_LABEL);
        assert_eq!(rig.surface.status(), STATUS_PLAYING);

        view.toggle_playback().unwrap();
        assert!(rig.video_a.is_paused() && rig.video_b.is_paused());
        assert_eq!(rig.surface.play_label(), PLAY_LABEL);
        assert_eq!(rig.surface.status(), STATUS_PAUSED);
    }

    #[test]
    fn playback_failure_reports_without_changing_label() {
        let (mut view, rig, _) = attached();
        view.load_media(pair().with_mode(ComparisonMode::SideBySide))
            .unwrap();
        rig.video_a.fail_play(Some("autoplay blocked"));
        assert!(view.toggle_playback().is_err());
        assert_eq!(rig.surface.status(), STATUS_PLAY_ERROR_COMBINED);
        assert_eq!(rig.surface.play_label(), PLAY_LABEL);
    }

    #[test]
    fn slider_playback_failure_on_either_video() {
        let (mut view, rig, telemetry) = attached();
        view.load_media(pair()).unwrap();

        rig.video_a.fail_play(Some("autoplay blocked"));
        assert!(matches!(view.toggle_playback(), Err(CompareError::Playback(_))));
        assert_eq!(rig.surface.status(), STATUS_PLAY_ERROR);
        assert_eq!(rig.surface.play_label(), PLAY_LABEL);
        assert!(rig.video_b.is_paused());

        rig.video_a.fail_play(None);
        rig.video_b.fail_play(Some("decoder busy"));
        assert!(view.toggle_playback().is_err());
        assert!(!rig.video_a.is_paused());
        assert_eq!(rig.surface.status(), STATUS_PLAY_ERROR);
        assert_eq!(rig.surface.play_label(), PLAY_LABEL);
        assert_eq!(telemetry.events("playback.error").len(), 2);
    }

    #[test]
    fn incomplete_message_is_ignored() {
        let (mut view, rig, _) = attached();
        let applied = rig.surface.applied();
        let msg = ExecutionMessage {
            video_a_url: Some(vec!["/a.mov".to_string()]),
            ..ExecutionMessage::default()
        };
        assert!(!view.on_executed(&msg).unwrap());
        assert_eq!(rig.surface.applied(), applied);
        assert_eq!(view.state(), &ComparisonState::default());
    }

    #[test]
    fn unknown_direction_warns_and_falls_back() {
        let (mut view, _, telemetry) = attached();
        let msg = ExecutionMessage::from_json_str(
            r#"{ "video_a_url": ["/a"], "video_b_url": ["/b"], "slider_direction": ["spiral"] }"#,
        )
        .unwrap();
        assert!(view.on_executed(&msg).unwrap());
        assert_eq!(view.state().direction(), SliderDirection::Horizontal);
        assert_eq!(telemetry.count_at(Level::Warn), 1);
    }
}
