//! PDF output.
//!
//! [`PdfBuilder`] accumulates pages into a fresh `lopdf` document with a
//! single flat page tree. Source PDFs have their objects renumbered past the
//! builder's highest id and their pages re-parented under the new tree;
//! images and text become newly drawn pages.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::config::{CompressionLevel, MergeOptions, Metadata};
use crate::error::{DocCatError, Result};
use crate::merge::DocumentBuilder;
use crate::merge::metadata::MetadataManager;
use crate::render::{FONT_RESOURCE, TextLayout, TextLine};
use crate::xml::XmlElement;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&str; 4] = ["MediaBox", "CropBox", "Resources", "Rotate"];

/// Guard against cyclic `Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// Page-sequence accumulator for PDF output.
pub struct PdfBuilder {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    layout: TextLayout,
    compression: CompressionLevel,
    metadata: Metadata,
}

impl PdfBuilder {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new(options: &MergeOptions) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            kids: Vec::new(),
            font_id: None,
            layout: TextLayout::new(options.layout),
            compression: options.compression,
            metadata: options.metadata.clone(),
        }
    }

    /// Pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Renumber, save and return the document bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().copied().map(Object::Reference).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        MetadataManager::new().set_metadata(&mut self.document, &self.metadata);

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => self.document.compress(),
            CompressionLevel::Maximum => {
                self.document.prune_objects();
                self.document.compress();
            }
        }
        self.document.renumber_objects();

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| DocCatError::other(format!("Failed to serialize PDF: {e}")))?;
        Ok(buffer)
    }

    fn push_page(&mut self, mut page: Dictionary) -> ObjectId {
        page.set("Type", "Page");
        page.set("Parent", self.pages_id);
        let id = self.document.add_object(page);
        self.kids.push(id);
        id
    }

    fn font(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_id = Some(id);
        id
    }

    /// Draw `lines` onto as many pages as needed (at least one).
    pub fn append_text(&mut self, lines: &[TextLine]) -> Result<usize> {
        let font_id = self.font();
        let opts = *self.layout.options();
        let pages = self.layout.paginate(lines);

        for page_lines in &pages {
            let content = self.layout.encode_page(page_lines)?;
            let content_id = self
                .document
                .add_object(Stream::new(Dictionary::new(), content));

            self.push_page(dictionary! {
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    opts.page_width.into(),
                    opts.page_height.into(),
                ],
                "Resources" => dictionary! {
                    "Font" => dictionary! { FONT_RESOURCE => font_id },
                },
                "Contents" => content_id,
            });
        }

        Ok(pages.len())
    }

    /// Look up inheritable attributes missing from `page_id` in its ancestors.
    fn inherited_attributes(source: &Document, page_id: ObjectId) -> Vec<(&'static str, Object)> {
        let Ok(page) = source.get_dictionary(page_id) else {
            return Vec::new();
        };

        let mut missing: Vec<&'static str> = INHERITABLE
            .into_iter()
            .filter(|key| !page.has(key.as_bytes()))
            .collect();
        let mut found = Vec::new();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

        for _ in 0..MAX_TREE_DEPTH {
            let Some(node) = parent.and_then(|id| source.get_dictionary(id).ok()) else {
                break;
            };
            if missing.is_empty() {
                break;
            }

            missing.retain(|key| match node.get(key.as_bytes()) {
                Ok(value) => {
                    found.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }

        found
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog") | Ok(b"Pages")
    )
}

impl DocumentBuilder for PdfBuilder {
    fn append_pdf(&mut self, mut source: Document) -> Result<usize> {
        source.renumber_objects_with(self.document.max_id + 1);

        // BTreeMap keyed by page number, so values come out in page order.
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

        for &page_id in &page_ids {
            let inherited = Self::inherited_attributes(&source, page_id);
            if let Ok(page) = source.get_dictionary_mut(page_id) {
                for (key, value) in inherited {
                    page.set(key, value);
                }
                page.set("Parent", self.pages_id);
            }
        }

        for (id, object) in source.objects {
            if !is_page_tree_node(&object) {
                self.document.objects.insert(id, object);
            }
        }
        self.document.max_id = self.document.max_id.max(source.max_id);
        self.kids.extend_from_slice(&page_ids);

        Ok(page_ids.len())
    }

    fn append_image(&mut self, image: image::RgbImage) -> Result<usize> {
        let (width, height) = image.dimensions();
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.into_raw(),
        );
        stream
            .compress()
            .map_err(|e| DocCatError::other(format!("Failed to compress image data: {e}")))?;
        let image_id = self.document.add_object(stream);

        let draw = format!("q {width} 0 0 {height} 0 0 cm /Im0 Do Q");
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), draw.into_bytes()));

        self.push_page(dictionary! {
            "MediaBox" => vec![
                0.into(),
                0.into(),
                i64::from(width).into(),
                i64::from(height).into(),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });

        Ok(1)
    }

    fn append_docx(&mut self, source: docx_rs::Docx) -> Result<usize> {
        let lines: Vec<TextLine> = super::docx::paragraph_texts(&source)
            .into_iter()
            .flat_map(|text| {
                text.split('\n')
                    .map(TextLine::new)
                    .collect::<Vec<_>>()
            })
            .collect();
        self.append_text(&lines)
    }

    fn append_xml(&mut self, root: &XmlElement) -> Result<usize> {
        let lines: Vec<TextLine> = root
            .preorder()
            .into_iter()
            .map(|line| TextLine::indented(line.depth, line.label()))
            .collect();
        self.append_text(&lines)
    }

    fn unit_count(&self) -> usize {
        self.page_count()
    }
}
