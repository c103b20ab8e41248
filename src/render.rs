//! Text drawing on PDF pages.
//!
//! This is the drawing primitive behind DOCX and XML inputs when the target
//! is PDF: lines of text are word-wrapped to the printable width, placed
//! top-down with a fixed leading and split onto a new page whenever the
//! vertical space runs out. Text is drawn with the built-in Helvetica font
//! using WinAnsi encoding, so no font program is embedded.
//!
//! Glyph widths are estimated from an average Helvetica advance, which is
//! good enough for a readable dump but does not reproduce source layout.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use crate::error::{DocCatError, Result};

/// Average Helvetica advance width as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// Resource name the page content uses for the text font.
pub const FONT_RESOURCE: &str = "F1";

/// Page geometry and typography for rendered text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    /// Margin on all four sides, in points.
    pub margin: f32,
    /// Font size in points.
    pub font_size: f32,
    /// Distance between baselines, in points.
    pub leading: f32,
    /// Horizontal offset per indentation level, in points.
    pub indent_width: f32,
}

impl LayoutOptions {
    /// US Letter, 1 inch margins, 11pt text.
    pub fn letter() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 72.0,
            font_size: 11.0,
            leading: 14.0,
            indent_width: 18.0,
        }
    }

    /// ISO A4 with the same typography as [`LayoutOptions::letter`].
    pub fn a4() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            ..Self::letter()
        }
    }

    /// Number of text lines that fit on one page (at least one).
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - 2.0 * self.margin;
        ((usable / self.leading).floor() as usize).max(1)
    }

    /// Maximum characters per line at the given indentation level (at least one).
    pub fn max_chars(&self, indent: usize) -> usize {
        let usable = self.page_width - 2.0 * self.margin - indent as f32 * self.indent_width;
        let glyph = self.font_size * AVERAGE_GLYPH_WIDTH;
        ((usable / glyph).floor().max(1.0)) as usize
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::letter()
    }
}

/// One logical line of text with an indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// Indentation level (multiplied by [`LayoutOptions::indent_width`]).
    pub indent: usize,
    /// Line content. May be empty for vertical spacing.
    pub text: String,
}

impl TextLine {
    /// Unindented line.
    pub fn new(text: impl Into<String>) -> Self {
        Self::indented(0, text)
    }

    /// Line at the given indentation level.
    pub fn indented(indent: usize, text: impl Into<String>) -> Self {
        Self {
            indent,
            text: text.into(),
        }
    }
}

/// Lays out text lines onto pages.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    options: LayoutOptions,
}

impl TextLayout {
    /// Create a layout with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Word-wrap one line to the printable width.
    ///
    /// Words longer than a full line are broken mid-word. An empty line
    /// wraps to a single empty line.
    pub fn wrap(&self, line: &TextLine) -> Vec<TextLine> {
        let max = self.options.max_chars(line.indent);
        let mut wrapped = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in line.text.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > max {
                if current_len > 0 {
                    wrapped.push(TextLine::indented(line.indent, std::mem::take(&mut current)));
                    current_len = 0;
                }
                let rest = chars.split_off(max);
                wrapped.push(TextLine::indented(line.indent, chars.iter().collect::<String>()));
                chars = rest;
            }

            if chars.is_empty() {
                continue;
            }

            let needed = if current_len == 0 {
                chars.len()
            } else {
                current_len + 1 + chars.len()
            };

            if needed > max {
                wrapped.push(TextLine::indented(line.indent, std::mem::take(&mut current)));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars.iter());
            current_len += chars.len();
        }

        if current_len > 0 || wrapped.is_empty() {
            wrapped.push(TextLine::indented(line.indent, current));
        }

        wrapped
    }

    /// Wrap every line and split the result into pages.
    ///
    /// Always returns at least one page, possibly empty.
    pub fn paginate(&self, lines: &[TextLine]) -> Vec<Vec<TextLine>> {
        let per_page = self.options.lines_per_page();
        let mut pages = Vec::new();
        let mut page = Vec::with_capacity(per_page);

        for line in lines.iter().flat_map(|line| self.wrap(line)) {
            if page.len() == per_page {
                pages.push(std::mem::replace(&mut page, Vec::with_capacity(per_page)));
            }
            page.push(line);
        }

        if !page.is_empty() || pages.is_empty() {
            pages.push(page);
        }

        pages
    }

    /// Content stream drawing one page of already-wrapped lines.
    ///
    /// The page's resources must map [`FONT_RESOURCE`] to a Helvetica font.
    pub fn page_content(&self, lines: &[TextLine]) -> Content {
        let opts = &self.options;
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    opts.font_size.into(),
                ],
            ),
        ];

        let top = opts.page_height - opts.margin - opts.font_size;
        for (row, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let x = opts.margin + line.indent as f32 * opts.indent_width;
            let y = top - row as f32 * opts.leading;
            operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    x.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&line.text),
                    StringFormat::Literal,
                )],
            ));
        }

        operations.push(Operation::new("ET", vec![]));
        Content { operations }
    }

    /// Encoded content stream bytes for one page.
    pub fn encode_page(&self, lines: &[TextLine]) -> Result<Vec<u8>> {
        self.page_content(lines)
            .encode()
            .map_err(|e| DocCatError::other(format!("Failed to encode page content: {e}")))
    }
}

/// Encode text for a simple font with WinAnsi encoding.
///
/// Latin-1 characters map to their code point and the typographic
/// characters of the 0x80-0x9F block (curly quotes, dashes, the euro sign
/// and so on) to their WinAnsi codes. Tabs become spaces, other control
/// characters are dropped and anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(b' '),
            c if c.is_control() => None,
            c if (c as u32) < 0x100 => Some(c as u32 as u8),
            c => Some(win_ansi_extra(c).unwrap_or(b'?')),
        })
        .collect()
}

/// WinAnsi code for characters outside Latin-1.
fn win_ansi_extra(c: char) -> Option<u8> {
    let code = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}
