//! In-memory media elements and surface for running a view without a browser.
//!
//! Clones share state, so a caller can keep one handle for inspection while the
//! view owns the other.

use std::{cell::RefCell, rc::Rc};

use crate::{
    foundation::error::{CompareError, CompareResult},
    handles::{PLAY_LABEL, ViewHandles, ViewSurface},
    layout::LayoutDescriptor,
    media::MediaElement,
};

#[derive(Clone, Debug, Default)]
struct MediaInner {
    source: String,
    loads: usize,
    paused: bool,
    time: f64,
    play_failure: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HeadlessMedia {
    inner: Rc<RefCell<MediaInner>>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MediaInner {
                paused: true,
                ..MediaInner::default()
            })),
        }
    }

    /// Make every following `play()` fail with `detail`; `None` clears it.
    pub fn fail_play(&self, detail: Option<&str>) {
        self.inner.borrow_mut().play_failure = detail.map(str::to_string);
    }

    pub fn source(&self) -> String {
        self.inner.borrow().source.clone()
    }

    pub fn load_count(&self) -> usize {
        self.inner.borrow().loads
    }
}

impl Default for HeadlessMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for HeadlessMedia {
    fn set_source(&mut self, url: &str) {
        url.clone_into(&mut self.inner.borrow_mut().source);
    }

    fn load(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.loads += 1;
        inner.time = 0.0;
        inner.paused = true;
    }

    fn play(&mut self) -> CompareResult<()> {
        let mut inner = self.inner.borrow_mut();
        if let Some(detail) = &inner.play_failure {
            return Err(CompareError::playback(detail.clone()));
        }
        inner.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.inner.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    fn current_time(&self) -> f64 {
        self.inner.borrow().time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.inner.borrow_mut().time = secs;
    }
}

#[derive(Clone, Debug)]
struct SurfaceInner {
    size: Option<[u32; 2]>,
    layout: Option<LayoutDescriptor>,
    applied: usize,
    status: String,
    play_label: String,
}

#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    inner: Rc<RefCell<SurfaceInner>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SurfaceInner {
                size: None,
                layout: None,
                applied: 0,
                status: String::new(),
                play_label: PLAY_LABEL.to_string(),
            })),
        }
    }

    pub fn size(&self) -> Option<[u32; 2]> {
        self.inner.borrow().size
    }

    pub fn layout(&self) -> Option<LayoutDescriptor> {
        self.inner.borrow().layout.clone()
    }

    /// Number of layouts applied so far.
    pub fn applied(&self) -> usize {
        self.inner.borrow().applied
    }

    pub fn status(&self) -> String {
        self.inner.borrow().status.clone()
    }

    pub fn play_label(&self) -> String {
        self.inner.borrow().play_label.clone()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSurface for HeadlessSurface {
    fn set_size(&mut self, size: [u32; 2]) {
        self.inner.borrow_mut().size = Some(size);
    }

    fn apply_layout(&mut self, layout: &LayoutDescriptor) {
        let mut inner = self.inner.borrow_mut();
        inner.layout = Some(layout.clone());
        inner.applied += 1;
    }

    fn set_status(&mut self, text: &str) {
        text.clone_into(&mut self.inner.borrow_mut().status);
    }

    fn set_play_label(&mut self, label: &str) {
        label.clone_into(&mut self.inner.borrow_mut().play_label);
    }
}

/// Shared handles to a headless view's elements.
#[derive(Clone, Debug, Default)]
pub struct HeadlessRig {
    pub video_a: HeadlessMedia,
    pub video_b: HeadlessMedia,
    pub surface: HeadlessSurface,
}

impl HeadlessRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed copies for a view; `self` keeps observing the same state.
    pub fn handles(&self) -> ViewHandles {
        ViewHandles::new(
            Box::new(self.video_a.clone()),
            Box::new(self.video_b.clone()),
            Box::new(self.surface.clone()),
        )
    }
}
