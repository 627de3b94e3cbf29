use pdf_writer::{Content, Name, Str};

use crate::fonts::{self, FontVariant, to_winansi_bytes};
use crate::richtext::StyledRun;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Alignment {
    Left,
    Center,
    Right,
}

pub(super) struct WordChunk {
    pub(super) variant: FontVariant,
    pub(super) text: String,
    pub(super) x_offset: f32, // x relative to line start
    pub(super) width: f32,
    pub(super) underline: bool,
}

pub(super) struct TextLine {
    pub(super) chunks: Vec<WordChunk>,
    pub(super) total_width: f32,
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Layout styled runs into wrapped lines. `\n` inside a run forces a break.
/// Handles cross-run contiguous text correctly: no space is inserted between
/// runs unless the preceding text ended with whitespace or the new run starts
/// with whitespace (e.g., "bold" + ", " → "bold," not "bold ,"). A word
/// wider than `max_width` is hard-split character by character.
pub(super) fn build_styled_lines(runs: &[StyledRun], font_size: f32, max_width: f32) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_chunks: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for run in runs {
        let variant = FontVariant::from_style(run.style);
        let space_w = fonts::space_width(variant, font_size);

        for (seg_idx, segment) in run.text.split('\n').enumerate() {
            if seg_idx > 0 {
                lines.push(finish_line(&mut current_chunks));
                current_x = 0.0;
                prev_ended_with_ws = false;
            }
            let starts_with_ws = segment.starts_with(char::is_whitespace);

            for (i, word) in segment.split_whitespace().enumerate() {
                let ww = fonts::text_width(word, variant, font_size);

                if ww > max_width {
                    if !current_chunks.is_empty() {
                        lines.push(finish_line(&mut current_chunks));
                    }
                    current_x = hard_split_word(
                        word,
                        variant,
                        font_size,
                        max_width,
                        run.style.underline,
                        &mut lines,
                        &mut current_chunks,
                    );
                    continue;
                }

                let need_space =
                    !current_chunks.is_empty() && (i > 0 || starts_with_ws || prev_ended_with_ws);

                // Within a run or leading ws → this run's space width;
                // trailing ws from the previous run → that run's space width
                let effective_space_w = if i > 0 || starts_with_ws {
                    space_w
                } else {
                    prev_space_w
                };

                let proposed_x = if need_space {
                    current_x + effective_space_w
                } else {
                    current_x
                };

                if !current_chunks.is_empty() && proposed_x + ww > max_width {
                    lines.push(finish_line(&mut current_chunks));
                    current_x = 0.0;
                } else {
                    current_x = proposed_x;
                }

                current_chunks.push(WordChunk {
                    variant,
                    text: word.to_string(),
                    x_offset: current_x,
                    width: ww,
                    underline: run.style.underline,
                });
                current_x += ww;
            }
        }

        prev_ended_with_ws = run.text.ends_with(char::is_whitespace);
        prev_space_w = space_w;
    }

    if !current_chunks.is_empty() {
        lines.push(finish_line(&mut current_chunks));
    }

    if lines.is_empty() {
        lines.push(TextLine {
            chunks: vec![],
            total_width: 0.0,
        });
    }
    lines
}

/// Break a word wider than the line into character pieces. Each full piece
/// becomes its own line; the remainder starts the next line. Returns the
/// width the remainder occupies there.
fn hard_split_word(
    word: &str,
    variant: FontVariant,
    font_size: f32,
    max_width: f32,
    underline: bool,
    lines: &mut Vec<TextLine>,
    current_chunks: &mut Vec<WordChunk>,
) -> f32 {
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if fonts::text_width(&piece, variant, font_size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            let width = fonts::text_width(&piece, variant, font_size);
            current_chunks.push(WordChunk {
                variant,
                text: std::mem::take(&mut piece),
                x_offset: 0.0,
                width,
                underline,
            });
            lines.push(finish_line(current_chunks));
            piece.push(ch);
        }
    }
    let width = fonts::text_width(&piece, variant, font_size);
    current_chunks.push(WordChunk {
        variant,
        text: piece,
        x_offset: 0.0,
        width,
        underline,
    });
    width
}

/// Word-wrap plain text to `max_width`. A single word wider than the line
/// is split character by character so captions can never overflow the slot.
pub(super) fn wrap_plain(text: &str, variant: FontVariant, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut push_word = |lines: &mut Vec<String>, current: &mut String, word: &str| {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fonts::text_width(&candidate, variant, font_size) <= max_width {
            *current = candidate;
            return;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(current));
        }
        if fonts::text_width(word, variant, font_size) <= max_width {
            *current = word.to_string();
            return;
        }
        // hard split an overlong word
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if fonts::text_width(&piece, variant, font_size) > max_width && piece.chars().count() > 1 {
                piece.pop();
                lines.push(std::mem::take(&mut piece));
                piece.push(ch);
            }
        }
        *current = piece;
    };

    for word in text.split_whitespace() {
        push_word(&mut lines, &mut current, word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Show one plain string at a position. The caller is inside no text object.
pub(super) fn show_text_at(
    content: &mut Content,
    text: &str,
    variant: FontVariant,
    font_size: f32,
    x: f32,
    y: f32,
) {
    content.begin_text();
    content.set_font(Name(variant.resource_name().as_bytes()), font_size);
    content.next_line(x, y);
    content.show(Str(&to_winansi_bytes(text)));
    content.end_text();
}

/// Render pre-built lines with the given alignment. Underlines are drawn as
/// thin filled rects after the text block.
pub(super) fn render_lines(
    content: &mut Content,
    lines: &[TextLine],
    alignment: Alignment,
    margin_left: f32,
    text_width: f32,
    font_size: f32,
    first_baseline_y: f32,
    line_pitch: f32,
) {
    for (line_num, line) in lines.iter().enumerate() {
        let y = first_baseline_y - line_num as f32 * line_pitch;
        let line_start_x = match alignment {
            Alignment::Center => margin_left + (text_width - line.total_width) / 2.0,
            Alignment::Right => margin_left + text_width - line.total_width,
            Alignment::Left => margin_left,
        };

        let mut decorations: Vec<(f32, f32)> = Vec::new();

        if !line.chunks.is_empty() {
            content.begin_text();
            let mut cur_variant: Option<FontVariant> = None;
            let mut td_x = 0.0_f32;
            let mut td_y = 0.0_f32;
            for chunk in &line.chunks {
                let x = line_start_x + chunk.x_offset;
                if cur_variant != Some(chunk.variant) {
                    content.set_font(Name(chunk.variant.resource_name().as_bytes()), font_size);
                    cur_variant = Some(chunk.variant);
                }
                content.next_line(x - td_x, y - td_y);
                td_x = x;
                td_y = y;
                content.show(Str(&to_winansi_bytes(&chunk.text)));
                if chunk.underline {
                    decorations.push((x, chunk.width));
                }
            }
            content.end_text();
        }

        let thick = (font_size * 0.05).max(0.5);
        let ul_y = y - font_size * 0.12;
        for &(dx, dw) in &decorations {
            content.rect(dx, ul_y - thick, dw, thick).fill_nonzero();
        }
    }
}
