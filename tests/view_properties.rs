use std::rc::Rc;

use video_compare::{
    ClipRegion, ComparisonMode, ComparisonState, ComparisonView, ContainerSize, ExecutionMessage,
    HeadlessRig, LoadRequest, MediaRef, MemoryTelemetry, PointerPos, SliderDirection, ViewOpts,
    clamp01, derive_layout,
};

const W: f64 = 640.0;
const H: f64 = 360.0;

fn container() -> ContainerSize {
    ContainerSize::new(W, H)
}

fn attached_view() -> (ComparisonView, HeadlessRig) {
    let mut view = ComparisonView::with_opts(ViewOpts::default(), Rc::new(MemoryTelemetry::new()));
    let rig = HeadlessRig::new();
    view.attach(rig.handles());
    (view, rig)
}

fn request(mode: ComparisonMode, direction: SliderDirection) -> LoadRequest {
    LoadRequest::new(MediaRef::from_url("/a.mov"), MediaRef::from_url("/b.mov"))
        .with_mode(mode)
        .with_direction(direction)
}

fn slider_state(direction: SliderDirection) -> ComparisonState {
    let mut s = ComparisonState::default();
    s.load_media(request(ComparisonMode::Slider, direction));
    s
}

#[test]
fn clamp01_range_and_identity() {
    let mut v = -3.0;
    while v <= 4.0 {
        let c = clamp01(v);
        assert!((0.0..=1.0).contains(&c));
        if (0.0..=1.0).contains(&v) {
            assert_eq!(c, v);
        }
        v += 0.0625;
    }
}

#[test]
fn set_direction_resets_split_for_every_direction() {
    let (mut view, _) = attached_view();
    view.load_media(request(ComparisonMode::Slider, SliderDirection::Horizontal))
        .unwrap();
    for d in SliderDirection::ALL {
        view.set_split_from_pointer(PointerPos::new(W * 0.9, H * 0.9), container());
        assert_ne!(view.state().split(), 0.5);
        view.set_direction(d);
        assert_eq!(view.state().split(), 0.5);
    }
}

#[test]
fn load_media_never_touches_split() {
    let (mut view, _) = attached_view();
    view.load_media(request(ComparisonMode::Slider, SliderDirection::Horizontal))
        .unwrap();
    view.set_split_from_pointer(PointerPos::new(W * 0.2, 0.0), container());
    let split = view.state().split();

    for (mode, dir) in [
        (ComparisonMode::SideBySide, SliderDirection::Vertical),
        (ComparisonMode::Slider, SliderDirection::Diagonal),
        (ComparisonMode::Slider, SliderDirection::Horizontal),
    ] {
        view.load_media(request(mode, dir)).unwrap();
        assert_eq!(view.state().split(), split);
    }
}

#[test]
fn load_media_is_idempotent() {
    let (mut view, rig) = attached_view();
    let req = request(ComparisonMode::Slider, SliderDirection::Diagonal);
    view.load_media(req.clone()).unwrap();
    let first = rig.surface.layout().unwrap();
    let state = view.state().clone();
    view.load_media(req).unwrap();
    assert_eq!(rig.surface.layout().unwrap(), first);
    assert_eq!(view.state(), &state);
}

#[test]
fn diagonal_corners() {
    let cases = [
        ((0.0, 0.0), 0.0),
        ((W, H), 1.0),
        ((W, 0.0), 0.5),
        ((0.0, H), 0.5),
    ];
    for ((x, y), expected) in cases {
        let mut s = slider_state(SliderDirection::Diagonal);
        assert!(s.set_split_from_pointer(PointerPos::new(x, y), container()));
        assert!((s.split() - expected).abs() < 1e-12, "({x},{y}) -> {}", s.split());
    }
}

#[test]
fn diagonal_ignores_motion_along_the_anti_diagonal() {
    let mut s = slider_state(SliderDirection::Diagonal);
    s.set_split_from_pointer(PointerPos::new(0.6 * W, 0.2 * H), container());
    let before = s.split();
    s.set_split_from_pointer(PointerPos::new(0.3 * W, 0.5 * H), container());
    assert!((s.split() - before).abs() < 1e-12);
}

#[test]
fn horizontal_split_at_thirty_percent() {
    let mut s = slider_state(SliderDirection::Horizontal);
    s.set_split_from_pointer(PointerPos::new(0.3 * W, 123.0), container());
    assert!((s.split() - 0.3).abs() < 1e-12);
}

#[test]
fn side_by_side_ignores_pointer_splits() {
    let (mut view, _) = attached_view();
    view.load_media(request(ComparisonMode::Slider, SliderDirection::Horizontal))
        .unwrap();
    view.set_mode(ComparisonMode::SideBySide);
    let before = view.state().split();
    for (x, y) in [(0.0, 0.0), (W, H), (W * 0.1, H * 0.7)] {
        view.set_split_from_pointer(PointerPos::new(x, y), container());
        view.pointer_down(PointerPos::new(x, y), container());
        view.pointer_move(PointerPos::new(y, x), container());
        view.pointer_up();
    }
    assert_eq!(view.state().split(), before);
}

#[test]
fn side_by_side_layout_hides_b_and_handle() {
    let (mut view, rig) = attached_view();
    view.load_media(request(ComparisonMode::SideBySide, SliderDirection::Horizontal))
        .unwrap();
    let layout = rig.surface.layout().unwrap();
    assert!(!layout.layer_b.visible);
    assert!(layout.handle.is_none());
    assert!(layout.layer_a.visible);
    assert_eq!(layout.layer_a.clip, ClipRegion::None);
    assert_eq!(layout.cursor.to_css(), "default");
}

#[test]
fn vertical_clip_follows_pointer_y_only() {
    for x in [0.0, 0.25 * W, W, 2.0 * W] {
        let (mut view, rig) = attached_view();
        view.load_media(request(ComparisonMode::Slider, SliderDirection::Vertical))
            .unwrap();
        view.set_split_from_pointer(PointerPos::new(x, 0.7 * H), container());
        let layout = rig.surface.layout().unwrap();
        match layout.layer_b.clip {
            ClipRegion::InsetTop { pct } => assert!((pct - 70.0).abs() < 1e-9),
            other => panic!("unexpected clip {other:?}"),
        }
        assert_eq!(layout.indicator, "Split: 70% (vertical)");
    }
}

#[test]
fn message_without_b_url_changes_nothing() {
    let (mut view, rig) = attached_view();
    view.load_media(request(ComparisonMode::Slider, SliderDirection::Vertical))
        .unwrap();
    let before = view.state().clone();
    let applied = rig.surface.applied();

    let msg = ExecutionMessage {
        video_a_url: Some(vec!["/other.mov".to_string()]),
        comparison_mode: Some(vec!["side_by_side".to_string()]),
        ..ExecutionMessage::default()
    };
    assert!(!view.on_executed(&msg).unwrap());
    assert_eq!(view.state(), &before);
    assert_eq!(rig.surface.applied(), applied);
    assert_eq!(rig.video_a.source(), "/a.mov");
}

#[test]
fn missing_media_renders_waiting_layout() {
    let mut s = ComparisonState::default();
    s.load_media(LoadRequest::new(MediaRef::from_url("/a.mov"), None));
    let layout = derive_layout(&s);
    assert!(layout.is_waiting());
    assert!(layout.handle.is_none());
    assert_eq!(layout.layer_b.clip, ClipRegion::None);
}
