//! Photo appendix: two slots per A4 page, rotation-aware centering and
//! wrapped, centered captions.

use pdf_writer::{Content, Name};

use crate::fonts::{self, FontVariant};
use crate::i18n;
use crate::images::PreparedPhoto;
use crate::model::{Language, Rotation};

use super::layout::{show_text_at, wrap_plain};
use super::{FOOTER_SPACE, HEADER_SPACE, PAGE_HEIGHT, PAGE_WIDTH};

const SLOT_HEIGHT: f32 = (PAGE_HEIGHT - HEADER_SPACE - FOOTER_SPACE) / 2.0;
/// 60pt side margin per side for the image itself.
const MAX_IMAGE_W: f32 = PAGE_WIDTH - 120.0;
/// Caption strip reserved at the bottom of each slot.
const MAX_IMAGE_H: f32 = SLOT_HEIGHT - 40.0;
const CAPTION_SIZE: f32 = 12.0;
const CAPTION_SIDE_MARGIN: f32 = 40.0;
const CAPTION_LINE_H: f32 = CAPTION_SIZE + 2.0;

/// XObject resource name for the `index`-th prepared photo (0-based).
pub(crate) fn photo_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Bottom y of a slot's area. The lower slot sits 5pt below the upper one.
fn slot_bottom(slot: usize) -> f32 {
    if slot == 0 {
        PAGE_HEIGHT - HEADER_SPACE - SLOT_HEIGHT
    } else {
        PAGE_HEIGHT - HEADER_SPACE - SLOT_HEIGHT * 2.0 - 5.0
    }
}

/// Draw one photo centered in its slot, honoring the stored rotation, with
/// its caption at the slot bottom.
fn draw_photo(
    content: &mut Content,
    photo: &PreparedPhoto,
    resource: &str,
    slot: usize,
    figure_number: usize,
    figure_label: &str,
) {
    let (px_w, px_h) = (photo.px_w as f32, photo.px_h as f32);

    // the box the image occupies after rotation
    let (bounding_w, bounding_h) = if photo.rotation.swaps_axes() {
        (px_h, px_w)
    } else {
        (px_w, px_h)
    };
    let scale = (MAX_IMAGE_W / bounding_w).min(MAX_IMAGE_H / bounding_h);
    let final_w = px_w * scale;
    let final_h = px_h * scale;

    let area_bottom = slot_bottom(slot);
    let center_x = PAGE_WIDTH / 2.0;
    let center_y = area_bottom + (SLOT_HEIGHT - 40.0) / 2.0 + 20.0;

    // origin of the rotated image so that its bounding box stays centered
    let (x, y) = match photo.rotation {
        Rotation::R0 => (center_x - final_w / 2.0, center_y - final_h / 2.0),
        Rotation::R90 => (center_x + final_h / 2.0, center_y - final_w / 2.0),
        Rotation::R180 => (center_x + final_w / 2.0, center_y + final_h / 2.0),
        Rotation::R270 => (center_x - final_h / 2.0, center_y + final_w / 2.0),
    };

    let (cos, sin) = match photo.rotation {
        Rotation::R0 => (1.0, 0.0),
        Rotation::R90 => (0.0, 1.0),
        Rotation::R180 => (-1.0, 0.0),
        Rotation::R270 => (0.0, -1.0),
    };
    content.save_state();
    content.transform([cos, sin, -sin, cos, x, y]);
    content.transform([final_w, 0.0, 0.0, final_h, 0.0, 0.0]);
    content.x_object(Name(resource.as_bytes()));
    content.restore_state();

    let caption = if photo.caption.trim().is_empty() {
        format!("{figure_label} {figure_number}")
    } else {
        format!("{figure_label} {figure_number} - {}", photo.caption.trim())
    };
    let max_caption_w = PAGE_WIDTH - CAPTION_SIDE_MARGIN * 2.0;
    let lines = wrap_plain(&caption, FontVariant::Regular, CAPTION_SIZE, max_caption_w);

    content.set_fill_gray(0.2);
    let mut current_y = area_bottom + 5.0;
    for line in &lines {
        let line_w = fonts::text_width(line, FontVariant::Regular, CAPTION_SIZE);
        show_text_at(
            content,
            line,
            FontVariant::Regular,
            CAPTION_SIZE,
            (PAGE_WIDTH - line_w) / 2.0,
            current_y,
        );
        current_y -= CAPTION_LINE_H;
    }
    content.set_fill_gray(0.0);
}

/// Render the appendix pages, two slots per page in record order. Figure
/// numbers are the 1-based position in the full photo list, so an empty
/// slot (undecodable photo) never renumbers the figures after it. Returns
/// one content stream per page.
pub(crate) fn render_appendix(photos: &[Option<PreparedPhoto>], language: Language) -> Vec<Content> {
    let figure_label = i18n::t("figura", language);
    let mut pages = Vec::new();

    for (page_idx, pair) in photos.chunks(2).enumerate() {
        let mut content = Content::new();
        for (slot, photo) in pair.iter().enumerate() {
            let Some(photo) = photo else { continue };
            let global_idx = page_idx * 2 + slot;
            draw_photo(
                &mut content,
                photo,
                &photo_resource_name(global_idx),
                slot,
                global_idx + 1,
                figure_label,
            );
        }
        pages.push(content);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(px_w: u32, px_h: u32, rotation: Rotation) -> PreparedPhoto {
        PreparedPhoto {
            id: "p".into(),
            caption: String::new(),
            rotation,
            data: vec![0xFF, 0xD8],
            recompressed: true,
            px_w,
            px_h,
        }
    }

    #[test]
    fn two_photos_per_page() {
        let photos: Vec<_> = (0..5).map(|_| Some(photo(400, 300, Rotation::R0))).collect();
        assert_eq!(render_appendix(&photos, Language::It).len(), 3);
        assert_eq!(render_appendix(&photos[..4], Language::It).len(), 2);
        assert!(render_appendix(&[], Language::It).is_empty());
    }

    #[test]
    fn rotated_photo_scales_by_swapped_bounding_box() {
        // 800x600 at 90°: bounding box 600x800, limited by slot height
        let p = photo(800, 600, Rotation::R90);
        let (bw, bh) = (600.0_f32, 800.0_f32);
        let scale = (MAX_IMAGE_W / bw).min(MAX_IMAGE_H / bh);
        assert!(scale * bh <= MAX_IMAGE_H + 0.01);
        assert!(scale * bw <= MAX_IMAGE_W + 0.01);
        // rendering must not panic for any rotation
        for rot in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
            let mut q = p.clone();
            q.rotation = rot;
            render_appendix(&[Some(q)], Language::En);
        }
    }

    #[test]
    fn empty_slot_keeps_subsequent_figure_numbers() {
        let photos = vec![
            Some(photo(400, 300, Rotation::R0)),
            None,
            Some(photo(400, 300, Rotation::R0)),
        ];
        let pages = render_appendix(&photos, Language::It);
        assert_eq!(pages.len(), 2);
        let second = pages.into_iter().nth(1).unwrap().finish();
        let text = String::from_utf8_lossy(&second).into_owned();
        assert!(text.contains("Figura 3"), "third photo must stay figure 3");
    }

    #[test]
    fn slots_do_not_overlap() {
        let upper_bottom = slot_bottom(0);
        let lower_top = slot_bottom(1) + SLOT_HEIGHT;
        assert!(lower_top <= upper_bottom);
    }

    #[test]
    fn resource_names_are_one_based() {
        assert_eq!(photo_resource_name(0), "Im1");
        assert_eq!(photo_resource_name(7), "Im8");
    }
}
