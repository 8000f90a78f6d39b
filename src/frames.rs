//! Frame preparation for the producer side and still previews of a layout.

use image::{Rgba, RgbaImage, imageops};
use kurbo::{Affine, Point, Rect, Shape as _, Size};

use crate::{
    foundation::error::{CompareError, CompareResult},
    layout::LayoutDescriptor,
};

const HANDLE_RGB: [u8; 3] = [255, 255, 255];
const HANDLE_ALPHA: f32 = 0.8;

/// Trim both sequences to the shorter one. Returns the common length.
pub fn sync_lengths<T>(a: &mut Vec<T>, b: &mut Vec<T>) -> usize {
    let n = a.len().min(b.len());
    a.truncate(n);
    b.truncate(n);
    n
}

/// Center-crop both frames to their common minimum size.
pub fn match_dimensions(a: &RgbaImage, b: &RgbaImage) -> (RgbaImage, RgbaImage) {
    let w = a.width().min(b.width());
    let h = a.height().min(b.height());
    (center_crop(a, w, h), center_crop(b, w, h))
}

fn center_crop(img: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if img.width() == w && img.height() == h {
        return img.clone();
    }
    let x = (img.width() - w) / 2;
    let y = (img.height() - h) / 2;
    imageops::crop_imm(img, x, y, w, h).to_image()
}

/// Scale both frames to the smaller height (keeping aspect) and place them
/// next to each other, A on the left.
pub fn combine_side_by_side(a: &RgbaImage, b: &RgbaImage) -> CompareResult<RgbaImage> {
    for (name, img) in [("A", a), ("B", b)] {
        if img.width() == 0 || img.height() == 0 {
            return Err(CompareError::frame(format!("frame {name} is empty")));
        }
    }

    let target_h = a.height().min(b.height());
    let scale = |img: &RgbaImage| -> RgbaImage {
        let w = (u64::from(img.width()) * u64::from(target_h) / u64::from(img.height())).max(1) as u32;
        if w == img.width() && target_h == img.height() {
            img.clone()
        } else {
            imageops::resize(img, w, target_h, imageops::FilterType::Triangle)
        }
    };
    let sa = scale(a);
    let sb = scale(b);

    let mut out = RgbaImage::new(sa.width() + sb.width(), target_h);
    imageops::replace(&mut out, &sa, 0, 0);
    imageops::replace(&mut out, &sb, i64::from(sa.width()), 0);
    Ok(out)
}

/// Render what the view shows for `layout`: B inside its clip region, A
/// everywhere else, and the split handle on top.
pub fn composite_preview(
    a: &RgbaImage,
    b: &RgbaImage,
    layout: &LayoutDescriptor,
) -> CompareResult<RgbaImage> {
    if layout.layer_b.visible && a.dimensions() != b.dimensions() {
        return Err(CompareError::frame(format!(
            "preview expects equal frame sizes, got {:?} and {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }

    let (w, h) = a.dimensions();
    let size = Size::new(f64::from(w), f64::from(h));
    let b_region = layout
        .layer_b
        .visible
        .then(|| layout.layer_b.clip.to_path(size));
    let handle = layout.handle.map(|hp| {
        let ext = hp.extent(size);
        let center = hp.center(size);
        let rect = Rect::from_center_size(center, ext);
        Affine::rotate_about(hp.rotation_deg().to_radians(), center) * rect.to_path(0.1)
    });

    let mut out = a.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let in_b = match &b_region {
            None => false,
            Some(None) => true,
            Some(Some(path)) => path.contains(p),
        };
        if in_b {
            *px = *b.get_pixel(x, y);
        }
        if handle.as_ref().is_some_and(|path| path.contains(p)) {
            *px = blend(*px, HANDLE_RGB, HANDLE_ALPHA);
        }
    }
    Ok(out)
}

fn blend(dst: Rgba<u8>, rgb: [u8; 3], alpha: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| -> u8 {
        (f32::from(s) * alpha + f32::from(d) * (1.0 - alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(dst[0], rgb[0]),
        mix(dst[1], rgb[1]),
        mix(dst[2], rgb[2]),
        dst[3].max((alpha * 255.0) as u8),
    ])
}
