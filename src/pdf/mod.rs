//! PDF production: base-document layout, photo appendix and final assembly.
//!
//! The base renderer flows sections down the page with a `slot_top` cursor.
//! Sections are keep-together blocks except the description, which may
//! split at line boundaries with its side borders redrawn per page. Pages
//! are materialized as bare content streams here; headers, footers and the
//! page tree are added in `assemble` once the total page count is known.

mod appendix;
mod assemble;
mod layout;

pub(crate) use appendix::render_appendix;
pub(crate) use assemble::assemble;

use pdf_writer::{Content, Name};

use crate::compose::{CheckOption, ComposedDocument, LabeledValue, SectionBody};
use crate::fonts::{self, FontVariant};
use layout::{Alignment, build_styled_lines, render_lines, show_text_at, wrap_plain};

pub(crate) const PAGE_WIDTH: f32 = 595.28;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;
pub(crate) const PAGE_PADDING: f32 = 30.0;
/// Space reserved above the content area for the logo/company header.
pub(crate) const HEADER_SPACE: f32 = 105.0;
/// Space reserved below the content area for the footer rule and text.
pub(crate) const FOOTER_SPACE: f32 = 70.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * PAGE_PADDING;

const BODY_SIZE: f32 = 10.0;
const LINE_PITCH: f32 = 15.0;
const TITLE_SIZE: f32 = 16.0;
const SECTION_TITLE_SIZE: f32 = 12.0;
const SMALL_SIZE: f32 = 9.0;
const NOTE_SIZE: f32 = 8.0;
const SECTION_GAP: f32 = 15.0;
const CELL_PAD: f32 = 9.0;
const BORDER_W: f32 = 0.8;
const BAND_H: f32 = 18.0;
const CHECKBOX: f32 = 12.0;
const SIGNATURE_W: f32 = 110.0;

/// Signature XObject resource name, shared with `assemble`.
pub(crate) const SIGNATURE_NAME: &str = "Sig";

/// Accumulates content streams page by page. `slot_top` is the y of the
/// next free line top; it never enters the footer area.
struct FlowPages {
    pages: Vec<Content>,
    current: Content,
    slot_top: f32,
}

impl FlowPages {
    fn new() -> Self {
        FlowPages {
            pages: Vec::new(),
            current: Content::new(),
            slot_top: PAGE_HEIGHT - HEADER_SPACE,
        }
    }

    fn remaining(&self) -> f32 {
        self.slot_top - FOOTER_SPACE
    }

    fn at_page_top(&self) -> bool {
        self.slot_top >= PAGE_HEIGHT - HEADER_SPACE - 0.01
    }

    fn flush(&mut self) {
        self.pages
            .push(std::mem::replace(&mut self.current, Content::new()));
        self.slot_top = PAGE_HEIGHT - HEADER_SPACE;
    }

    /// Move to the next page unless `needed` fits or the page is untouched.
    fn ensure(&mut self, needed: f32) {
        if needed > self.remaining() && !self.at_page_top() {
            self.flush();
        }
    }

    fn finish(mut self) -> Vec<Content> {
        self.pages.push(self.current);
        self.pages
    }
}

fn fill_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, gray: f32) {
    content.set_fill_gray(gray);
    content.rect(x, y, w, h).fill_nonzero();
    content.set_fill_gray(0.0);
}

/// Section outline, drawn last so it sits on top of the fills.
fn stroke_border(content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
    content.set_line_width(BORDER_W);
    content.rect(x, y, w, h).stroke();
}

/// A 12pt checkbox with the baseline-aligned label to its right. Returns
/// the x just past the label.
fn draw_check_option(content: &mut Content, option: &CheckOption, x: f32, baseline: f32) -> f32 {
    let box_bottom = baseline - 1.5;
    content.set_line_width(BORDER_W);
    content.rect(x, box_bottom, CHECKBOX, CHECKBOX).stroke();
    if option.checked {
        content.set_line_width(1.2);
        content.move_to(x + 2.4, box_bottom + 6.0);
        content.line_to(x + 5.0, box_bottom + 3.0);
        content.line_to(x + 10.0, box_bottom + 9.5);
        content.stroke();
    }
    let label_x = x + CHECKBOX + 6.0;
    show_text_at(content, &option.label, FontVariant::Regular, BODY_SIZE, label_x, baseline);
    label_x + fonts::text_width(&option.label, FontVariant::Regular, BODY_SIZE)
}

fn value_lines(value: &str, width: f32) -> Vec<String> {
    wrap_plain(value, FontVariant::Regular, BODY_SIZE, width)
}

/// Render the translated document into bare page content streams.
/// `signature_dims` are the pixel dimensions of the signature image, when
/// one was supplied; the image itself is embedded during assembly.
pub(crate) fn render_base(
    doc: &ComposedDocument,
    signature_dims: Option<(u32, u32)>,
) -> Vec<Content> {
    let mut flow = FlowPages::new();

    render_title_block(&mut flow, doc);

    for section in &doc.sections {
        flow.slot_top -= SECTION_GAP;
        match section {
            SectionBody::ProjectInfo {
                heading,
                date,
                serial,
                roles,
            } => render_project_info(&mut flow, heading, date, serial, roles),
            SectionBody::WorkItems { rows } => render_work_items(&mut flow, rows),
            SectionBody::MethodChecklist { title, options } => {
                render_checklist(&mut flow, title, options, None, true)
            }
            SectionBody::DescriptionOutcome {
                description_title,
                description,
                outcome_title,
                options,
                note,
            } => {
                render_description(&mut flow, description_title, description);
                render_checklist(&mut flow, outcome_title, options, Some(note.as_str()), false);
            }
            SectionBody::SignatureBlock {
                headers,
                date,
                inspector,
                on_behalf_of,
            } => render_signature_block(
                &mut flow,
                headers,
                date,
                inspector,
                on_behalf_of,
                signature_dims,
            ),
        }
    }

    flow.finish()
}

fn render_title_block(flow: &mut FlowPages, doc: &ComposedDocument) {
    // hand-position the title and subtitle, both centered
    let title_y = flow.slot_top - TITLE_SIZE;
    let content = &mut flow.current;
    let tw = fonts::text_width(&doc.title, FontVariant::Bold, TITLE_SIZE);
    show_text_at(
        content,
        &doc.title,
        FontVariant::Bold,
        TITLE_SIZE,
        PAGE_PADDING + (CONTENT_WIDTH - tw) / 2.0,
        title_y,
    );
    let sub_y = title_y - 5.0 - BODY_SIZE;
    let sw = fonts::text_width(&doc.subtitle, FontVariant::Regular, BODY_SIZE);
    content.set_fill_gray(0.4);
    show_text_at(
        content,
        &doc.subtitle,
        FontVariant::Regular,
        BODY_SIZE,
        PAGE_PADDING + (CONTENT_WIDTH - sw) / 2.0,
        sub_y,
    );
    content.set_fill_gray(0.0);
    let rule_y = sub_y - 10.0;
    fill_rect(content, PAGE_PADDING, rule_y, CONTENT_WIDTH, 0.8, 0.8);
    flow.slot_top = rule_y;
}

fn render_project_info(
    flow: &mut FlowPages,
    heading: &str,
    date: &LabeledValue,
    serial: &LabeledValue,
    roles: &[String],
) {
    let row_h = 10.0 + 11.0 + 13.0;
    let height = BAND_H + row_h;
    flow.ensure(height);

    let top = flow.slot_top;
    let bottom = top - height;
    let content = &mut flow.current;

    fill_rect(content, PAGE_PADDING, top - BAND_H, CONTENT_WIDTH, BAND_H, 0.9);
    show_text_at(
        content,
        heading,
        FontVariant::Bold,
        SECTION_TITLE_SIZE,
        PAGE_PADDING + CELL_PAD,
        top - 13.0,
    );
    fill_rect(content, PAGE_PADDING, top - BAND_H, CONTENT_WIDTH, 0.5, 0.0);

    let col_w = CONTENT_WIDTH / 3.0;
    let label_y = top - BAND_H - 5.0 - SMALL_SIZE;
    let value_y = label_y - 13.0;
    let columns: [(&str, &str); 2] = [
        (date.label.as_str(), date.value.as_str()),
        (serial.label.as_str(), serial.value.as_str()),
    ];
    for (i, (label, value)) in columns.into_iter().enumerate() {
        let x = PAGE_PADDING + i as f32 * col_w + CELL_PAD;
        content.set_fill_gray(0.4);
        show_text_at(content, label, FontVariant::Regular, SMALL_SIZE, x, label_y);
        content.set_fill_gray(0.0);
        show_text_at(content, value, FontVariant::Regular, BODY_SIZE, x, value_y);
    }
    let role_x = PAGE_PADDING + 2.0 * col_w + CELL_PAD;
    content.set_fill_gray(0.4);
    for (i, role) in roles.iter().enumerate() {
        show_text_at(
            content,
            role,
            FontVariant::Regular,
            SMALL_SIZE,
            role_x,
            label_y - i as f32 * 11.0,
        );
    }
    content.set_fill_gray(0.0);

    // column dividers
    for i in 1..3 {
        let x = PAGE_PADDING + i as f32 * col_w;
        fill_rect(content, x, bottom, 0.5, row_h, 0.8);
    }

    stroke_border(content, PAGE_PADDING, bottom, CONTENT_WIDTH, height);
    flow.slot_top = bottom;
}

fn render_work_items(flow: &mut FlowPages, rows: &[LabeledValue]) {
    let col_w = CONTENT_WIDTH / 2.0;
    let text_w = col_w - 2.0 * CELL_PAD;

    let wrapped: Vec<Vec<String>> = rows.iter().map(|r| value_lines(&r.value, text_w)).collect();
    let row_heights: Vec<f32> = wrapped
        .iter()
        .map(|lines| 10.0 + lines.len() as f32 * LINE_PITCH)
        .collect();
    let height: f32 = row_heights.iter().sum();
    flow.ensure(height);

    let top = flow.slot_top;
    let bottom = top - height;
    let content = &mut flow.current;

    let mut y = top;
    for (i, (row, lines)) in rows.iter().zip(&wrapped).enumerate() {
        let row_h = row_heights[i];
        let baseline = y - 5.0 - BODY_SIZE;
        show_text_at(
            content,
            &row.label,
            FontVariant::Bold,
            BODY_SIZE,
            PAGE_PADDING + CELL_PAD,
            baseline,
        );
        for (j, line) in lines.iter().enumerate() {
            show_text_at(
                content,
                line,
                FontVariant::Regular,
                BODY_SIZE,
                PAGE_PADDING + col_w + CELL_PAD,
                baseline - j as f32 * LINE_PITCH,
            );
        }
        y -= row_h;
        if i + 1 < rows.len() {
            fill_rect(content, PAGE_PADDING + 10.0, y, CONTENT_WIDTH - 20.0, 0.5, 0.8);
        }
    }

    fill_rect(content, PAGE_PADDING + col_w, bottom, 0.5, height, 0.8);
    stroke_border(content, PAGE_PADDING, bottom, CONTENT_WIDTH, height);
    flow.slot_top = bottom;
}

/// Checkbox strip with its section title, kept together. Used for both the
/// inspection methods (bordered section) and the check result, which runs
/// on below the description block and carries the note.
fn render_checklist(
    flow: &mut FlowPages,
    title: &str,
    options: &[CheckOption],
    note: Option<&str>,
    bordered: bool,
) {
    let note_lines = note.map(|n| wrap_plain(n, FontVariant::Regular, NOTE_SIZE, CONTENT_WIDTH - 16.0));
    let note_h = note_lines
        .as_ref()
        .map(|l| 8.0 + l.len() as f32 * 10.0)
        .unwrap_or(0.0);
    let height = BAND_H + CHECKBOX + 8.0 + note_h;
    flow.ensure(height);

    let top = flow.slot_top;
    let content = &mut flow.current;

    show_text_at(
        content,
        title,
        FontVariant::Bold,
        SECTION_TITLE_SIZE,
        PAGE_PADDING + CELL_PAD,
        top - 13.0,
    );

    let baseline = top - BAND_H - CHECKBOX + 2.0;
    let mut x = PAGE_PADDING + 12.0;
    for option in options {
        x = draw_check_option(content, option, x, baseline) + 20.0;
    }

    let mut bottom = top - BAND_H - CHECKBOX - 8.0;
    if let Some(lines) = &note_lines {
        content.set_fill_gray(0.4);
        for line in lines {
            bottom -= 10.0;
            show_text_at(content, line, FontVariant::Regular, NOTE_SIZE, PAGE_PADDING + 8.0, bottom);
        }
        content.set_fill_gray(0.0);
        bottom -= 8.0;
    }
    if bordered {
        stroke_border(content, PAGE_PADDING, top - height, CONTENT_WIDTH, height);
    }
    flow.slot_top = bottom;
}

/// The description block: bordered left and right, splittable at line
/// boundaries. Side borders are drawn per page segment so the box reads as
/// continuous across the break; the horizontal rules close only the real
/// start and end of the block.
fn render_description(
    flow: &mut FlowPages,
    title: &str,
    runs: &[crate::richtext::StyledRun],
) {
    let text_w = CONTENT_WIDTH - 2.0 * CELL_PAD;
    let lines = build_styled_lines(runs, BODY_SIZE, text_w);

    // keep the title and at least two lines together
    flow.ensure(BORDER_W + BAND_H + 2.0 * LINE_PITCH + 6.0);

    let mut seg_top = flow.slot_top;
    let content = &mut flow.current;
    fill_rect(content, PAGE_PADDING, seg_top - BORDER_W, CONTENT_WIDTH, BORDER_W, 0.0);
    show_text_at(
        &mut flow.current,
        title,
        FontVariant::Bold,
        SECTION_TITLE_SIZE,
        PAGE_PADDING + CELL_PAD,
        seg_top - 14.0,
    );
    flow.slot_top = seg_top - BAND_H - 2.0;

    let mut idx = 0;
    while idx < lines.len() {
        if flow.remaining() < LINE_PITCH {
            let content = &mut flow.current;
            let seg_bottom = flow.slot_top;
            fill_rect(content, PAGE_PADDING, seg_bottom, BORDER_W, seg_top - seg_bottom, 0.0);
            fill_rect(
                content,
                PAGE_PADDING + CONTENT_WIDTH - BORDER_W,
                seg_bottom,
                BORDER_W,
                seg_top - seg_bottom,
                0.0,
            );
            flow.flush();
            seg_top = flow.slot_top;
        }
        let baseline = flow.slot_top - BODY_SIZE;
        render_lines(
            &mut flow.current,
            &lines[idx..idx + 1],
            Alignment::Left,
            PAGE_PADDING + CELL_PAD,
            text_w,
            BODY_SIZE,
            baseline,
            LINE_PITCH,
        );
        flow.slot_top -= LINE_PITCH;
        idx += 1;
    }

    let seg_bottom = flow.slot_top - 4.0;
    let content = &mut flow.current;
    fill_rect(content, PAGE_PADDING, seg_bottom, BORDER_W, seg_top - seg_bottom, 0.0);
    fill_rect(
        content,
        PAGE_PADDING + CONTENT_WIDTH - BORDER_W,
        seg_bottom,
        BORDER_W,
        seg_top - seg_bottom,
        0.0,
    );
    fill_rect(content, PAGE_PADDING, seg_bottom, CONTENT_WIDTH, BORDER_W, 0.0);
    flow.slot_top = seg_bottom - 4.0;
}

fn render_signature_block(
    flow: &mut FlowPages,
    headers: &[String; 4],
    date: &str,
    inspector: &str,
    on_behalf_of: &str,
    signature_dims: Option<(u32, u32)>,
) {
    let sig_h = signature_dims
        .map(|(w, h)| SIGNATURE_W * h as f32 / w as f32)
        .unwrap_or(0.0);
    let header_h = 10.0 + 12.0;
    let value_h = (sig_h + 10.0).max(LINE_PITCH + 10.0);
    let height = header_h + value_h;
    flow.ensure(height);

    let top = flow.slot_top;
    let bottom = top - height;
    let content = &mut flow.current;
    let col_w = CONTENT_WIDTH / 4.0;

    let head_y = top - 5.0 - BODY_SIZE;
    for (i, header) in headers.iter().enumerate() {
        let hw = fonts::text_width(header, FontVariant::Regular, BODY_SIZE);
        let x = PAGE_PADDING + i as f32 * col_w + (col_w - hw) / 2.0;
        show_text_at(content, header, FontVariant::Regular, BODY_SIZE, x, head_y);
    }
    fill_rect(content, PAGE_PADDING + 10.0, top - header_h, CONTENT_WIDTH - 20.0, 0.5, 0.8);

    let value_y = top - header_h - 5.0 - BODY_SIZE;
    let values: [&str; 3] = [date, inspector, on_behalf_of];
    for (i, value) in values.into_iter().enumerate() {
        let vw = fonts::text_width(value, FontVariant::Regular, BODY_SIZE);
        let x = PAGE_PADDING + i as f32 * col_w + (col_w - vw) / 2.0;
        show_text_at(content, value, FontVariant::Regular, BODY_SIZE, x, value_y);
    }
    if let Some((w, h)) = signature_dims {
        let sig_h = SIGNATURE_W * h as f32 / w as f32;
        let x = PAGE_PADDING + 3.0 * col_w + (col_w - SIGNATURE_W) / 2.0;
        let y = bottom + 5.0;
        content.save_state();
        content.transform([SIGNATURE_W, 0.0, 0.0, sig_h, x, y]);
        content.x_object(Name(SIGNATURE_NAME.as_bytes()));
        content.restore_state();
    }

    for i in 1..4 {
        let x = PAGE_PADDING + i as f32 * col_w;
        fill_rect(content, x, bottom, 0.5, height, 0.8);
    }
    stroke_border(content, PAGE_PADDING, bottom, CONTENT_WIDTH, height);
    flow.slot_top = bottom;
}
