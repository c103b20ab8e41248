//! DOCX output.
//!
//! [`DocxBuilder`] accumulates body elements in a `docx-rs` document. DOCX
//! inputs contribute their body elements verbatim; every other input becomes
//! newly built paragraphs.

use std::io::Cursor;

use docx_rs::{
    BreakType, DocumentChild, Docx, InsertChild, MoveToChild, Paragraph, ParagraphChild, Pic,
    Run, RunChild, StructuredDataTag, StructuredDataTagChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use crate::config::MergeOptions;
use crate::error::{DocCatError, Result};
use crate::merge::DocumentBuilder;
use crate::xml::XmlElement;

/// English Metric Units per inch.
const EMU_PER_INCH: f32 = 914_400.0;

/// Left indent per XML nesting level, in twentieths of a point (0.25 in).
const INDENT_TWIPS_PER_LEVEL: i32 = 360;

/// Body-element accumulator for DOCX output.
pub struct DocxBuilder {
    docx: Docx,
    elements: usize,
    image_width_emu: u32,
}

impl DocxBuilder {
    /// Create an empty document.
    pub fn new(options: &MergeOptions) -> Self {
        Self {
            docx: Docx::new(),
            elements: 0,
            image_width_emu: (options.image_width * EMU_PER_INCH).round() as u32,
        }
    }

    /// Body elements appended so far.
    pub fn element_count(&self) -> usize {
        self.elements
    }

    /// Pack the document into `.docx` bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut buffer)
            .map_err(|e| DocCatError::other(format!("Failed to package DOCX: {e}")))?;
        Ok(buffer.into_inner())
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) {
        let docx = std::mem::take(&mut self.docx);
        self.docx = docx.add_paragraph(paragraph);
        self.elements += 1;
    }

    /// Display size in EMU for an image, fixed width and preserved aspect ratio.
    fn display_size(&self, width: u32, height: u32) -> (u32, u32) {
        let ratio = height as f64 / width.max(1) as f64;
        let height_emu = (self.image_width_emu as f64 * ratio).round() as u32;
        (self.image_width_emu, height_emu.max(1))
    }
}

/// Paragraph with one run, line breaks between the lines of `text`.
fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_inline_text(&paragraph.children, &mut text);
    text
}

/// Text of inline content, descending into hyperlinks, tracked insertions,
/// moves and inline content controls.
fn push_inline_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, text),
            ParagraphChild::Hyperlink(link) => push_inline_text(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let InsertChild::Run(run) = child {
                        push_run_text(run, text);
                    }
                }
            }
            ParagraphChild::MoveTo(moved) => {
                for child in &moved.children {
                    if let MoveToChild::Run(run) = child {
                        push_run_text(run, text);
                    }
                }
            }
            ParagraphChild::StructuredDataTag(tag) => push_tag_text(tag, text),
            _ => {}
        }
    }
}

fn push_tag_text(tag: &StructuredDataTag, text: &mut String) {
    for child in &tag.children {
        match child {
            StructuredDataTagChild::Run(run) => push_run_text(run, text),
            StructuredDataTagChild::Paragraph(paragraph) => {
                if !text.is_empty() {
                    text.push('\n');
                }
                push_inline_text(&paragraph.children, text);
            }
            StructuredDataTagChild::StructuredDataTag(inner) => push_tag_text(inner, text),
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

/// Plain text of every body paragraph, in document order.
///
/// Table cells contribute one entry per cell paragraph, row by row. Block
/// content controls contribute their paragraphs and tables the same way.
pub fn paragraph_texts(docx: &Docx) -> Vec<String> {
    let mut texts = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => texts.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => push_table_texts(table, &mut texts),
            DocumentChild::StructuredDataTag(tag) => push_block_tag_texts(tag, &mut texts),
            _ => {}
        }
    }
    texts
}

fn push_block_tag_texts(tag: &StructuredDataTag, texts: &mut Vec<String>) {
    for child in &tag.children {
        match child {
            StructuredDataTagChild::Paragraph(paragraph) => texts.push(paragraph_text(paragraph)),
            StructuredDataTagChild::Table(table) => push_table_texts(table, texts),
            StructuredDataTagChild::StructuredDataTag(inner) => push_block_tag_texts(inner, texts),
            StructuredDataTagChild::Run(run) => {
                let mut text = String::new();
                push_run_text(run, &mut text);
                texts.push(text);
            }
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn push_table_texts(table: &Table, texts: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    texts.push(paragraph_text(paragraph));
                }
            }
        }
    }
}

impl DocumentBuilder for DocxBuilder {
    fn append_pdf(&mut self, source: lopdf::Document) -> Result<usize> {
        let pages: Vec<u32> = source.get_pages().into_keys().collect();
        for &page_number in &pages {
            let text = source.extract_text(&[page_number]).map_err(|e| {
                DocCatError::other(format!("Failed to extract text from page {page_number}: {e}"))
            })?;
            self.push_paragraph(text_paragraph(text.trim_end()));
        }
        Ok(pages.len())
    }

    fn append_image(&mut self, image: image::RgbImage) -> Result<usize> {
        let (width, height) = image.dimensions();
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| DocCatError::other(format!("Failed to encode image: {e}")))?;

        let (width_emu, height_emu) = self.display_size(width, height);
        let pic = Pic::new(&png.into_inner()).size(width_emu, height_emu);
        self.push_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)));
        Ok(1)
    }

    fn append_docx(&mut self, source: Docx) -> Result<usize> {
        let children = source.document.children;
        let count = children.len();
        self.docx.document.children.extend(children);
        self.elements += count;
        Ok(count)
    }

    fn append_xml(&mut self, root: &XmlElement) -> Result<usize> {
        let lines = root.preorder();
        for line in &lines {
            let indent = line.depth as i32 * INDENT_TWIPS_PER_LEVEL;
            let paragraph = Paragraph::new()
                .add_run(Run::new().add_text(line.label()))
                .indent(Some(indent), None, None, None);
            self.push_paragraph(paragraph);
        }
        Ok(lines.len())
    }

    fn unit_count(&self) -> usize {
        self.element_count()
    }
}
