use crate::{layout::LayoutDescriptor, media::MediaElement};

pub const PLAY_LABEL: &str = "▶ Play";
pub const PAUSE_LABEL: &str = "⏸ Pause";

/// Host-side sink for everything the view paints besides the videos.
pub trait ViewSurface {
    /// Preferred widget size as `[width, height]`.
    fn set_size(&mut self, size: [u32; 2]);
    /// Apply clip regions, handle placement, cursor and split indicator.
    fn apply_layout(&mut self, layout: &LayoutDescriptor);
    fn set_status(&mut self, text: &str);
    fn set_play_label(&mut self, label: &str);
}

/// The visual elements a view drives, built by the host when a node is created.
pub struct ViewHandles {
    pub video_a: Box<dyn MediaElement>,
    pub video_b: Box<dyn MediaElement>,
    pub surface: Box<dyn ViewSurface>,
}

impl ViewHandles {
    pub fn new(
        video_a: Box<dyn MediaElement>,
        video_b: Box<dyn MediaElement>,
        surface: Box<dyn ViewSurface>,
    ) -> Self {
        Self {
            video_a,
            video_b,
            surface,
        }
    }
}

impl std::fmt::Debug for ViewHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandles").finish_non_exhaustive()
    }
}
