//! Final assembly: embeds fonts and images, stamps the header and footer on
//! every page and writes the page tree.
//!
//! This is the only stage that knows the total page count, so "Page P of T"
//! is always consistent between the base document and the appendix.

use image::GenericImageView;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{self, FontVariant, register_fonts, to_winansi_bytes};
use crate::i18n;
use crate::images::PreparedPhoto;
use crate::model::{Branding, Language};

use super::appendix::photo_resource_name;
use super::{CONTENT_WIDTH, PAGE_HEIGHT, PAGE_PADDING, PAGE_WIDTH, SIGNATURE_NAME};

pub(crate) const LOGO_NAME: &str = "Logo";

const FOOTER_RULE_Y: f32 = 40.0;
const FOOTER_TEXT_Y: f32 = 25.0;
const FOOTER_SIZE: f32 = 8.0;
const HEADER_RULE_Y: f32 = PAGE_HEIGHT - 98.0;
/// The logo row sits between the top page padding and the header rule.
const LOGO_MAX_H: f32 = 45.0;

/// Embed arbitrary PNG/JPEG bytes as an image XObject under `pdf_name`.
/// Returns the pixel dimensions for aspect-correct drawing.
fn embed_image(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    xobjects: &mut Vec<(String, Ref)>,
    pdf_name: &str,
    data: &[u8],
) -> Result<(u32, u32), Error> {
    let xobj_ref = alloc();
    let format = image::guess_format(data)
        .map_err(|e| Error::Image(format!("{pdf_name}: unrecognized format: {e}")))?;

    let dims = match format {
        image::ImageFormat::Jpeg => {
            let decoded = image::load_from_memory_with_format(data, format)
                .map_err(|e| Error::Image(format!("{pdf_name}: {e}")))?;
            let (w, h) = decoded.dimensions();
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            (w, h)
        }
        _ => {
            let decoded = image::load_from_memory(data)
                .map_err(|e| Error::Image(format!("{pdf_name}: {e}")))?;
            let rgba = decoded.to_rgba8();
            let (w, h) = rgba.dimensions();
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
            (w, h)
        }
    };

    xobjects.push((pdf_name.to_string(), xobj_ref));
    Ok(dims)
}

/// Embed a recompressed photo. Baseline JPEG by construction.
fn embed_photo(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    xobjects: &mut Vec<(String, Ref)>,
    pdf_name: &str,
    photo: &PreparedPhoto,
) {
    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &photo.data);
    xobj.filter(Filter::DctDecode);
    xobj.width(photo.px_w as i32);
    xobj.height(photo.px_h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    xobjects.push((pdf_name.to_string(), xobj_ref));
}

fn show_text(content: &mut Content, text: &str, variant: FontVariant, size: f32, x: f32, y: f32) {
    content.begin_text();
    content.set_font(Name(variant.resource_name().as_bytes()), size);
    content.next_line(x, y);
    content.show(Str(&to_winansi_bytes(text)));
    content.end_text();
}

/// Logo row, company name and header rule, identical on every page.
fn stamp_header(content: &mut Content, branding: Branding, logo_dims: Option<(u32, u32)>) {
    if let Some((w, h)) = logo_dims {
        let lw = branding.logo_width();
        let lh = (lw * h as f32 / w as f32).min(LOGO_MAX_H);
        let lw = lh * w as f32 / h as f32;
        let y = PAGE_HEIGHT - 45.0 - lh;
        content.save_state();
        content.transform([lw, 0.0, 0.0, lh, PAGE_PADDING, y]);
        content.x_object(Name(LOGO_NAME.as_bytes()));
        content.restore_state();

        let name = branding.header_company_name();
        if !name.is_empty() {
            show_text(
                content,
                name,
                FontVariant::Bold,
                10.0,
                PAGE_PADDING + lw + 10.0,
                y + lh / 2.0 - 3.5,
            );
        }
    } else {
        let name = branding.company_name();
        show_text(content, name, FontVariant::Bold, 10.0, PAGE_PADDING, PAGE_HEIGHT - 60.0);
    }
    content.set_fill_gray(0.0);
    content.rect(PAGE_PADDING, HEADER_RULE_Y, CONTENT_WIDTH, 1.0).fill_nonzero();
}

/// Footer rule, the page counter on the left and the measured right-aligned
/// contact line.
fn stamp_footer(content: &mut Content, branding: Branding, language: Language, page: u32, total: u32) {
    content.set_fill_gray(0.0);
    content.rect(PAGE_PADDING, FOOTER_RULE_Y, CONTENT_WIDTH, 1.0).fill_nonzero();

    content.set_fill_gray(0.4);
    let left = i18n::footer_line(branding.company_name(), language, page, total);
    show_text(content, &left, FontVariant::Regular, FOOTER_SIZE, PAGE_PADDING, FOOTER_TEXT_Y);

    let contact = branding.contact_line();
    let cw = fonts::text_width(contact, FontVariant::Regular, FOOTER_SIZE);
    show_text(
        content,
        contact,
        FontVariant::Regular,
        FOOTER_SIZE,
        PAGE_WIDTH - PAGE_PADDING - cw,
        FOOTER_TEXT_Y,
    );
    content.set_fill_gray(0.0);
}

/// Stamp headers and footers, embed all resources and serialize the PDF.
/// `base` and `appendix` pages are concatenated in that order.
pub(crate) fn assemble(
    base: Vec<Content>,
    appendix: Vec<Content>,
    photos: &[Option<PreparedPhoto>],
    language: Language,
    branding: Branding,
    logo: Option<&[u8]>,
    signature: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let mut pdf = Pdf::new();
    let mut next_ref = 1;
    let mut alloc = || {
        let r = Ref::new(next_ref);
        next_ref += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_refs = register_fonts(&mut pdf, &mut alloc);

    let mut xobjects: Vec<(String, Ref)> = Vec::new();
    let logo_dims = match logo {
        Some(data) => Some(embed_image(&mut pdf, &mut alloc, &mut xobjects, LOGO_NAME, data)?),
        None => None,
    };
    if let Some(data) = signature {
        embed_image(&mut pdf, &mut alloc, &mut xobjects, SIGNATURE_NAME, data)?;
    }
    for (i, photo) in photos.iter().enumerate() {
        let Some(photo) = photo else { continue };
        let name = photo_resource_name(i);
        if photo.recompressed {
            embed_photo(&mut pdf, &mut alloc, &mut xobjects, &name, photo);
        } else {
            // fallback bytes keep their source format
            embed_image(&mut pdf, &mut alloc, &mut xobjects, &name, &photo.data)?;
        }
    }

    let mut all_contents = base;
    all_contents.extend(appendix);
    let total = all_contents.len() as u32;

    let page_ids: Vec<Ref> = (0..total).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..total).map(|_| alloc()).collect();

    for (i, mut content) in all_contents.into_iter().enumerate() {
        stamp_header(&mut content, branding, logo_dims);
        stamp_footer(&mut content, branding, language, i as u32 + 1, total);
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(total as i32);

    for i in 0..total as usize {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (variant, font_ref) in FontVariant::ALL.into_iter().zip(font_refs) {
                font_dict.pair(Name(variant.resource_name().as_bytes()), font_ref);
            }
        }
        if !xobjects.is_empty() {
            let mut xobject_dict = resources.x_objects();
            for (name, xobj_ref) in &xobjects {
                xobject_dict.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    Ok(pdf.finish())
}
