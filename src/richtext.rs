//! Inline rich-text parser for the site-visit description field.
//!
//! The editor produces a tiny markup subset: `<b>`, `<i>` and `<u>` tags,
//! shortest-match, nestable. Nested tags union their flags onto the inner
//! text. Everything else is literal text. Parsing never fails; an
//! unmatched tag is just text.

/// Style of a single run. Nested tags union their flags, so a run can
/// carry any combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleFlags {
    pub const NONE: StyleFlags = StyleFlags {
        bold: false,
        italic: false,
        underline: false,
    };

    pub const BOLD: StyleFlags = StyleFlags {
        bold: true,
        italic: false,
        underline: false,
    };

    pub const ITALIC: StyleFlags = StyleFlags {
        bold: false,
        italic: true,
        underline: false,
    };

    pub const UNDERLINE: StyleFlags = StyleFlags {
        bold: false,
        italic: false,
        underline: true,
    };

    pub fn union(self, other: StyleFlags) -> StyleFlags {
        StyleFlags {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
        }
    }
}

/// A maximal run of text sharing one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleFlags,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            style: StyleFlags::NONE,
        }
    }

    pub fn styled(text: impl Into<String>, style: StyleFlags) -> Self {
        StyledRun {
            text: text.into(),
            style,
        }
    }
}

/// Collapse the whitespace the editor leaks into saved text: `&nbsp;`
/// entities and U+00A0 become plain spaces, then horizontal whitespace
/// runs collapse to one space. Newlines survive as line breaks.
fn normalize(text: &str) -> String {
    let text = text.replace("&nbsp;", " ");
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        let is_horizontal_ws = matches!(ch, ' ' | '\t' | '\u{0C}' | '\u{0B}' | '\u{A0}');
        if is_horizontal_ws {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn style_for(tag: u8) -> StyleFlags {
    match tag {
        b'b' => StyleFlags::BOLD,
        b'i' => StyleFlags::ITALIC,
        _ => StyleFlags::UNDERLINE,
    }
}

/// Find the next well-formed `<b>..</b>` / `<i>..</i>` / `<u>..</u>` pair at
/// or after `from`. Shortest match: the first matching close tag ends the
/// run. Returns (open_start, inner_start, inner_end, close_end, tag).
fn next_tag(s: &str, from: usize) -> Option<(usize, usize, usize, usize, u8)> {
    let bytes = s.as_bytes();
    let mut i = from;
    while let Some(rel) = s[i..].find('<') {
        let open = i + rel;
        if open + 3 <= s.len() {
            let tag = bytes[open + 1];
            if matches!(tag, b'b' | b'i' | b'u') && bytes[open + 2] == b'>' {
                let inner_start = open + 3;
                let close_pat = match tag {
                    b'b' => "</b>",
                    b'i' => "</i>",
                    _ => "</u>",
                };
                if let Some(rel_close) = s[inner_start..].find(close_pat) {
                    let inner_end = inner_start + rel_close;
                    return Some((open, inner_start, inner_end, inner_end + 4, tag));
                }
            }
        }
        i = open + 1;
    }
    None
}

/// Parse `text` into styled runs. Whitespace is normalized first; inputs
/// without any angle bracket skip the scan entirely.
pub fn parse(text: &str) -> Vec<StyledRun> {
    let text = normalize(text);
    if text.is_empty() {
        return Vec::new();
    }
    if !text.contains('<') && !text.contains('>') {
        return vec![StyledRun::plain(text)];
    }

    let mut runs = Vec::new();
    parse_styled(&text, StyleFlags::NONE, &mut runs);
    runs
}

/// Emit runs for `s`, carrying `base` from the enclosing tags. Each matched
/// pair recurses with the union of `base` and the tag's own flag, so nested
/// markup stacks styles on the inner text.
fn parse_styled(s: &str, base: StyleFlags, runs: &mut Vec<StyledRun>) {
    let mut pos = 0;
    while let Some((open, inner_start, inner_end, close_end, tag)) = next_tag(s, pos) {
        if open > pos {
            runs.push(StyledRun::styled(&s[pos..open], base));
        }
        // empty tag pairs produce no run
        if inner_end > inner_start {
            parse_styled(&s[inner_start..inner_end], base.union(style_for(tag)), runs);
        }
        pos = close_end;
    }
    if pos < s.len() {
        runs.push(StyledRun::styled(&s[pos..], base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_run() {
        let runs = parse("No markup here.");
        assert_eq!(runs, vec![StyledRun::plain("No markup here.")]);
    }

    #[test]
    fn mixed_styles_split_into_runs() {
        let runs = parse("<b>Crack</b> found at <i>column 4</i>");
        assert_eq!(
            runs,
            vec![
                StyledRun::styled("Crack", StyleFlags::BOLD),
                StyledRun::plain(" found at "),
                StyledRun::styled("column 4", StyleFlags::ITALIC),
            ]
        );
    }

    #[test]
    fn underline_tag_parses() {
        let runs = parse("see <u>note 7</u>.");
        assert_eq!(
            runs,
            vec![
                StyledRun::plain("see "),
                StyledRun::styled("note 7", StyleFlags::UNDERLINE),
                StyledRun::plain("."),
            ]
        );
    }

    #[test]
    fn nested_tags_union_styles() {
        let runs = parse("<b>bold <i>and italic</i></b>");
        let bold_italic = StyleFlags {
            bold: true,
            italic: true,
            underline: false,
        };
        assert_eq!(
            runs,
            vec![
                StyledRun::styled("bold ", StyleFlags::BOLD),
                StyledRun::styled("and italic", bold_italic),
            ]
        );
    }

    #[test]
    fn triple_nesting_stacks_all_flags() {
        let runs = parse("<u><b>x<i>y</i></b></u>");
        let bold_underline = StyleFlags {
            bold: true,
            italic: false,
            underline: true,
        };
        let all = StyleFlags {
            bold: true,
            italic: true,
            underline: true,
        };
        assert_eq!(
            runs,
            vec![
                StyledRun::styled("x", bold_underline),
                StyledRun::styled("y", all),
            ]
        );
    }

    #[test]
    fn unmatched_tags_are_literal_text() {
        let runs = parse("a <b> dangling open");
        assert_eq!(runs, vec![StyledRun::plain("a <b> dangling open")]);
        let runs = parse("stray </i> close");
        assert_eq!(runs, vec![StyledRun::plain("stray </i> close")]);
    }

    #[test]
    fn mismatched_pair_is_literal() {
        // <b>..</i> is not a pair; the later <i>..</i> would need its own open
        let runs = parse("<b>wrong</i>");
        assert_eq!(runs, vec![StyledRun::plain("<b>wrong</i>")]);
    }

    #[test]
    fn shortest_match_on_repeated_tags() {
        let runs = parse("<b>one</b> mid <b>two</b>");
        assert_eq!(
            runs,
            vec![
                StyledRun::styled("one", StyleFlags::BOLD),
                StyledRun::plain(" mid "),
                StyledRun::styled("two", StyleFlags::BOLD),
            ]
        );
    }

    #[test]
    fn nbsp_and_tab_runs_collapse() {
        let runs = parse("a&nbsp;&nbsp;b\t\tc\u{A0}d");
        assert_eq!(runs, vec![StyledRun::plain("a b c d")]);
    }

    #[test]
    fn newlines_survive_normalization() {
        let runs = parse("line one\nline two");
        assert_eq!(runs, vec![StyledRun::plain("line one\nline two")]);
    }

    #[test]
    fn empty_tag_pair_yields_nothing() {
        let runs = parse("before<b></b>after");
        assert_eq!(
            runs,
            vec![StyledRun::plain("before"), StyledRun::plain("after")]
        );
    }

    #[test]
    fn empty_input_is_no_runs() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn unclosed_nested_tag_stays_literal() {
        // the inner <i> never closes inside the bold pair, so it is text
        let runs = parse("<b>a <i>b</b> c</i>");
        assert_eq!(
            runs,
            vec![
                StyledRun::styled("a <i>b", StyleFlags::BOLD),
                StyledRun::plain(" c</i>"),
            ]
        );
    }
}
