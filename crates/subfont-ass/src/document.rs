//! Line-oriented ASS/SSA document model.
//!
//! Only `Style:`, `Dialogue:` and `Comment:` records are decoded; every other
//! line is kept verbatim. Records are keyed by the most recent `Format:` line.

use std::fmt;
use std::rc::Rc;

const BOM: char = '\u{FEFF}';
const FORMAT_PREFIX: &str = "Format:";
const STYLE_PREFIX: &str = "Style:";
const DIALOGUE_PREFIX: &str = "Dialogue:";
const COMMENT_PREFIX: &str = "Comment:";

/// Errors produced while decoding a document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// Input is not valid UTF-8
    InvalidUtf8 { offset: usize },
    /// A record appeared before any `Format:` line
    MissingFormat { line: usize },
    /// The active `Format:` line lacks a field the record needs
    MissingField { line: usize, field: &'static str },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 at byte {}", offset)
            }
            DocumentError::MissingFormat { line } => {
                write!(f, "line {}: record before any Format line", line)
            }
            DocumentError::MissingField { line, field } => {
                write!(f, "line {}: record has no {} field", line, field)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

type Format = Rc<[String]>;

fn field_index(format: &Format, field: &str) -> Option<usize> {
    format.iter().position(|f| f.eq_ignore_ascii_case(field))
}

/// A `Style:` line.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRecord {
    format: Format,
    values: Vec<String>,
    name_idx: usize,
    fontname_idx: usize,
    /// Source line, written back until a field changes.
    raw: Option<String>,
}

impl StyleRecord {
    fn parse(raw: &str, body: &str, format: Format, line: usize) -> Result<Self, DocumentError> {
        let values: Vec<String> = body.split(',').map(|v| v.trim().to_string()).collect();
        let name_idx = field_index(&format, "Name")
            .filter(|&i| i < values.len())
            .ok_or(DocumentError::MissingField { line, field: "Name" })?;
        let fontname_idx = field_index(&format, "Fontname")
            .filter(|&i| i < values.len())
            .ok_or(DocumentError::MissingField { line, field: "Fontname" })?;
        Ok(Self { format, values, name_idx, fontname_idx, raw: Some(raw.to_string()) })
    }

    pub fn name(&self) -> &str {
        &self.values[self.name_idx]
    }

    pub fn fontname(&self) -> &str {
        &self.values[self.fontname_idx]
    }

    pub fn set_fontname(&mut self, fontname: impl Into<String>) {
        let fontname = fontname.into();
        if self.values[self.fontname_idx] != fontname {
            self.values[self.fontname_idx] = fontname;
            self.raw = None;
        }
    }

    /// Looks up any field by its `Format:` name.
    pub fn get(&self, field: &str) -> Option<&str> {
        field_index(&self.format, field)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Dialogue,
    Comment,
}

/// A `Dialogue:` or `Comment:` line. The text field is the last field and
/// may itself contain commas.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    kind: EventKind,
    format: Format,
    values: Vec<String>,
    style_idx: usize,
    text: String,
    raw: Option<String>,
}

impl EventRecord {
    fn parse(kind: EventKind, raw: &str, body: &str, format: Format, line: usize) -> Result<Self, DocumentError> {
        if format.is_empty() {
            return Err(DocumentError::MissingField { line, field: "Text" });
        }
        let mut values: Vec<String> = body
            .splitn(format.len(), ',')
            .map(str::to_string)
            .collect();
        let text = if values.len() == format.len() {
            values.pop().unwrap_or_default()
        } else {
            String::new()
        };
        for value in values.iter_mut() {
            *value = value.trim().to_string();
        }
        let style_idx = field_index(&format, "Style")
            .filter(|&i| i < values.len())
            .ok_or(DocumentError::MissingField { line, field: "Style" })?;
        Ok(Self { kind, format, values, style_idx, text, raw: Some(raw.to_string()) })
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_comment(&self) -> bool {
        self.kind == EventKind::Comment
    }

    /// Name of the style the event is drawn with.
    pub fn style(&self) -> &str {
        &self.values[self.style_idx]
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.raw = None;
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        field_index(&self.format, field)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Raw(String),
    Style(StyleRecord),
    Event(EventRecord),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Raw(raw) => f.write_str(raw),
            Line::Style(StyleRecord { raw: Some(raw), .. }) | Line::Event(EventRecord { raw: Some(raw), .. }) => {
                f.write_str(raw)
            }
            Line::Style(style) => write!(f, "{} {}", STYLE_PREFIX, style.values.join(",")),
            Line::Event(event) => {
                let prefix = match event.kind {
                    EventKind::Dialogue => DIALOGUE_PREFIX,
                    EventKind::Comment => COMMENT_PREFIX,
                };
                write!(f, "{} {},{}", prefix, event.values.join(","), event.text)
            }
        }
    }
}

/// A parsed subtitle document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    /// Decodes UTF-8 bytes, with or without a byte-order mark.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DocumentError::InvalidUtf8 { offset: e.valid_up_to() })?;
        Self::parse(text)
    }

    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        let mut format: Option<Format> = None;
        let mut lines = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            if let Some(body) = raw.strip_prefix(FORMAT_PREFIX) {
                format = Some(body.split(',').map(|f| f.trim().to_string()).collect());
                lines.push(Line::Raw(raw.to_string()));
            } else if let Some(body) = raw.strip_prefix(STYLE_PREFIX) {
                let format = format.clone().ok_or(DocumentError::MissingFormat { line: line_no })?;
                lines.push(Line::Style(StyleRecord::parse(raw, body, format, line_no)?));
            } else if let Some((kind, body)) = event_body(raw) {
                let format = format.clone().ok_or(DocumentError::MissingFormat { line: line_no })?;
                lines.push(Line::Event(EventRecord::parse(kind, raw, body, format, line_no)?));
            } else {
                lines.push(Line::Raw(raw.to_string()));
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleRecord> {
        self.lines.iter().filter_map(|line| match line {
            Line::Style(style) => Some(style),
            _ => None,
        })
    }

    pub fn styles_mut(&mut self) -> impl Iterator<Item = &mut StyleRecord> {
        self.lines.iter_mut().filter_map(|line| match line {
            Line::Style(style) => Some(style),
            _ => None,
        })
    }

    /// The last style declared under `name`.
    pub fn style(&self, name: &str) -> Option<&StyleRecord> {
        self.styles().filter(|s| s.name() == name).last()
    }

    pub fn events(&self) -> impl Iterator<Item = &EventRecord> {
        self.lines.iter().filter_map(|line| match line {
            Line::Event(event) => Some(event),
            _ => None,
        })
    }

    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut EventRecord> {
        self.lines.iter_mut().filter_map(|line| match line {
            Line::Event(event) => Some(event),
            _ => None,
        })
    }

    /// Serializes with a leading byte-order mark and CRLF line endings.
    pub fn to_string_crlf(&self) -> String {
        let mut out = String::new();
        out.push(BOM);
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push_str("\r\n");
        }
        out
    }
}

fn event_body(raw: &str) -> Option<(EventKind, &str)> {
    if let Some(body) = raw.strip_prefix(DIALOGUE_PREFIX) {
        Some((EventKind::Dialogue, body))
    } else {
        raw.strip_prefix(COMMENT_PREFIX).map(|body| (EventKind::Comment, body))
    }
}
