//! Tokenizer for ASS event text.
//!
//! Event text is a sequence of literal runs and override blocks (`{...}`).
//! Only a handful of override tags matter for font selection; everything
//! else is passed through byte-for-byte.

use std::ops::Range;

/// Rendered replacement for the `\h` escape.
pub const HARD_SPACE: char = '\u{00A0}';

/// A slice of event text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, escapes not yet interpreted.
    Text(&'a str),
    /// The inside of a closed override block, braces excluded.
    Override(&'a str),
}

/// Iterator over the segments of an event line.
///
/// A `{` with no closing `}` after it is literal text.
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Segments<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let bytes = self.text.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        let rest = &bytes[self.pos..];
        match memchr::memchr(b'{', rest) {
            Some(0) => match memchr::memchr(b'}', &rest[1..]) {
                Some(close) => {
                    let start = self.pos + 1;
                    let end = start + close;
                    self.pos = end + 1;
                    Some(Segment::Override(&self.text[start..end]))
                }
                None => {
                    let start = self.pos;
                    self.pos = bytes.len();
                    Some(Segment::Text(&self.text[start..]))
                }
            },
            Some(open) => {
                let start = self.pos;
                self.pos += open;
                Some(Segment::Text(&self.text[start..self.pos]))
            }
            None => {
                let start = self.pos;
                self.pos = bytes.len();
                Some(Segment::Text(&self.text[start..]))
            }
        }
    }
}

/// Override tags that influence which font draws the following text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// `\fn<name>`; the name is trimmed and may be empty (reset to style font).
    FontName(&'a str),
    /// `\r` or `\r<style>`; an empty name resets to the event's own style.
    Reset(&'a str),
    /// `\p<scale>`; a non-zero scale switches text runs to drawing commands.
    Drawing(u32),
    Other(&'a str),
}

/// A single tag inside an override block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTag<'a> {
    /// Span of the tag argument within the block. For `\fn` this is
    /// everything up to the next backslash or the end of the block.
    pub argument: Range<usize>,
    pub kind: TagKind<'a>,
}

/// Iterator over the backslash-introduced tags of one override block.
///
/// Text before the first backslash (a comment, by convention) is skipped.
pub struct Tags<'a> {
    block: &'a str,
    pos: usize,
}

impl<'a> Tags<'a> {
    pub fn new(block: &'a str) -> Self {
        Self { block, pos: 0 }
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = OverrideTag<'a>;

    fn next(&mut self) -> Option<OverrideTag<'a>> {
        let bytes = self.block.as_bytes();
        let slash = self.pos + memchr::memchr(b'\\', bytes.get(self.pos..)?)?;
        let start = slash + 1;
        let end = memchr::memchr(b'\\', &bytes[start..])
            .map(|p| start + p)
            .unwrap_or(bytes.len());
        self.pos = end;

        let body = &self.block[start..end];
        let (argument, kind) = if let Some(arg) = body.strip_prefix("fn") {
            (start + 2..end, TagKind::FontName(arg.trim()))
        } else if let Some(arg) = body.strip_prefix('r') {
            (start + 1..end, TagKind::Reset(arg.trim()))
        } else if let Some(scale) = drawing_scale(body) {
            (start + 1..end, TagKind::Drawing(scale))
        } else {
            (start..end, TagKind::Other(body))
        };
        Some(OverrideTag { argument, kind })
    }
}

fn drawing_scale(body: &str) -> Option<u32> {
    let digits = body.strip_prefix('p')?;
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    Some(digits[..len].parse().unwrap_or(u32::MAX))
}

/// Appends `raw` to `out` with the `\h`, `\n` and `\N` escapes interpreted.
pub fn push_rendered(raw: &str, out: &mut String) {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let Some(slash) = memchr::memchr(b'\\', &bytes[i..]).map(|p| i + p) else {
            out.push_str(&raw[i..]);
            break;
        };
        out.push_str(&raw[i..slash]);
        match bytes.get(slash + 1) {
            Some(b'h') => {
                out.push(HARD_SPACE);
                i = slash + 2;
            }
            Some(b'n') | Some(b'N') => {
                out.push('\n');
                i = slash + 2;
            }
            _ => {
                out.push('\\');
                i = slash + 1;
            }
        }
    }
}

/// The text an event renders: override blocks and drawing commands removed,
/// escapes interpreted.
pub fn plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut drawing = false;
    for segment in Segments::new(text) {
        match segment {
            Segment::Text(raw) if !drawing => push_rendered(raw, &mut out),
            Segment::Text(_) => {}
            Segment::Override(block) => {
                for tag in Tags::new(block) {
                    if let TagKind::Drawing(scale) = tag.kind {
                        drawing = scale > 0;
                    }
                }
            }
        }
    }
    out
}

/// Rewrites every non-blank `\fn` argument inside override blocks with
/// `replace(name)`. Literal runs and all other tags are left untouched.
pub fn rewrite_font_overrides<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    for segment in Segments::new(text) {
        match segment {
            Segment::Text(raw) => out.push_str(raw),
            Segment::Override(block) => {
                out.push('{');
                let mut last = 0;
                for tag in Tags::new(block) {
                    if let TagKind::FontName(name) = tag.kind {
                        if name.is_empty() {
                            continue;
                        }
                        out.push_str(&block[last..tag.argument.start]);
                        out.push_str(&replace(name));
                        last = tag.argument.end;
                    }
                }
                out.push_str(&block[last..]);
                out.push('}');
            }
        }
    }
    out
}

/// Font selection in effect while a run is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFont<'a> {
    /// The event's own style font.
    Inherit,
    /// The font of another style selected with `\r<style>`.
    Style(&'a str),
    /// An explicit `\fn` font name, untranslated.
    Font(&'a str),
}

/// A rendered run together with the font that draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    pub font: ActiveFont<'a>,
    pub text: String,
}

/// Splits an event into rendered runs, tracking `\fn`, `\r` and `\p`.
///
/// Adjacent runs drawn with the same font are merged; empty runs are dropped.
pub fn runs(text: &str) -> Vec<Run<'_>> {
    let mut runs: Vec<Run<'_>> = Vec::new();
    let mut style: Option<&str> = None;
    let mut font: Option<&str> = None;
    let mut drawing = false;

    for segment in Segments::new(text) {
        match segment {
            Segment::Override(block) => {
                for tag in Tags::new(block) {
                    match tag.kind {
                        TagKind::FontName(name) => {
                            font = if name.is_empty() { None } else { Some(name) };
                        }
                        TagKind::Reset(name) => {
                            style = if name.is_empty() { None } else { Some(name) };
                            font = None;
                        }
                        TagKind::Drawing(scale) => drawing = scale > 0,
                        TagKind::Other(_) => {}
                    }
                }
            }
            Segment::Text(_) if drawing => {}
            Segment::Text(raw) => {
                let active = match (font, style) {
                    (Some(name), _) => ActiveFont::Font(name),
                    (None, Some(name)) => ActiveFont::Style(name),
                    (None, None) => ActiveFont::Inherit,
                };
                match runs.last_mut() {
                    Some(last) if last.font == active => push_rendered(raw, &mut last.text),
                    _ => {
                        let mut rendered = String::new();
                        push_rendered(raw, &mut rendered);
                        runs.push(Run { font: active, text: rendered });
                    }
                }
            }
        }
    }

    runs.retain(|run| !run.text.is_empty());
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn splits_text_and_blocks() {
        let segments: Vec<_> = Segments::new(r"a{\b1}b{}c").collect();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Override(r"\b1"),
                Segment::Text("b"),
                Segment::Override(""),
                Segment::Text("c"),
            ]
        );
    }

    #[test]
    fn unclosed_brace_is_text() {
        let segments: Vec<_> = Segments::new("ab{cd").collect();
        assert_eq!(segments, vec![Segment::Text("ab"), Segment::Text("{cd")]);
        assert_eq!(plain_text("ab{cd"), "ab{cd");
    }

    #[test]
    fn nested_open_brace_belongs_to_first_block() {
        let segments: Vec<_> = Segments::new("{a{b}c").collect();
        assert_eq!(segments, vec![Segment::Override("a{b"), Segment::Text("c")]);
    }

    #[test]
    fn recognizes_font_reset_and_drawing_tags() {
        let kinds: Vec<_> = Tags::new(r"comment\fn Noto Sans \r\rAlt\p1\pos(1,2)\b1")
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TagKind::FontName("Noto Sans"),
                TagKind::Reset(""),
                TagKind::Reset("Alt"),
                TagKind::Drawing(1),
                TagKind::Other("pos(1,2)"),
                TagKind::Other("b1"),
            ]
        );
    }

    #[test]
    fn font_argument_runs_to_block_end() {
        let block = r"\fnArial";
        let tag = Tags::new(block).next().unwrap();
        assert_eq!(&block[tag.argument], "Arial");
    }

    #[test]
    fn plain_text_interprets_escapes() {
        assert_eq!(plain_text(r"a\Nb\nc\hd"), "a\nb\nc\u{00A0}d");
        assert_eq!(plain_text(r"{\i1}Hello{\i0} world"), "Hello world");
        assert_eq!(plain_text(r"back\slash"), r"back\slash");
        assert_eq!(plain_text("trailing\\"), "trailing\\");
    }

    #[test]
    fn plain_text_skips_drawing_runs() {
        assert_eq!(plain_text(r"{\p1}m 0 0 l 10 10{\p0}after"), "after");
        assert_eq!(plain_text(r"{\p1}m 0 0 l 10 10"), "");
    }

    #[test]
    fn rewrite_only_touches_font_arguments() {
        let out = rewrite_font_overrides(r"{\b1\fnArial\i1}x{\fn @Mincho }y\fnNot", |name| {
            format!("<{}>", name)
        });
        assert_eq!(out, r"{\b1\fn<Arial>\i1}x{\fn<@Mincho>}y\fnNot");
    }

    #[test]
    fn rewrite_keeps_blank_font_reset() {
        let text = r"{\fn}x{unclosed";
        assert_eq!(rewrite_font_overrides(text, |_| "X".to_string()), text);
    }

    #[test]
    fn rewrite_handles_directive_at_block_edges() {
        let out = rewrite_font_overrides(r"{\fnA}{\fnB\b1}", |name| name.to_lowercase());
        assert_eq!(out, r"{\fna}{\fnb\b1}");
    }

    #[test]
    fn runs_track_font_changes() {
        let runs = runs(r"Hi {\fnMono}there{\r}again{\rAlt}x");
        assert_eq!(
            runs,
            vec![
                Run { font: ActiveFont::Inherit, text: "Hi ".into() },
                Run { font: ActiveFont::Font("Mono"), text: "there".into() },
                Run { font: ActiveFont::Inherit, text: "again".into() },
                Run { font: ActiveFont::Style("Alt"), text: "x".into() },
            ]
        );
    }

    #[test]
    fn runs_merge_same_font_and_drop_drawings() {
        let runs = runs(r"a{\b1}b{\p1}m 0 0{\p0\fnX}{\fn}c");
        assert_eq!(runs, vec![Run { font: ActiveFont::Inherit, text: "abc".into() }]);
    }

    #[test]
    fn random_input_never_panics() {
        let alphabet = ['{', '}', '\\', 'f', 'n', 'r', 'p', '1', 'N', 'h', 'あ', ' ', 'x'];
        let mut rng = rand::rng();
        for _ in 0..2000 {
            let len = rng.random_range(0..40);
            let text: String = (0..len)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                .collect();
            let plain = plain_text(&text);
            let joined: String = runs(&text).into_iter().map(|r| r.text).collect();
            assert_eq!(plain, joined, "input: {:?}", text);
            let rewritten = rewrite_font_overrides(&text, |n| n.to_string());
            assert_eq!(plain_text(&rewritten), plain);
        }
    }
}
