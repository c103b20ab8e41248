//! PDF metadata management.
//!
//! This module writes the document Info dictionary of PDF output:
//! - Title, Author, Subject, Keywords from [`Metadata`]
//! - Creator and Producer, always set to this crate
//! - Creation and modification dates (UTC)
//!
//! Text outside ASCII is stored as a UTF-16BE text string with a byte order
//! mark, which every PDF reader understands.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Metadata;

/// Manager for PDF metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Set metadata on a document.
    ///
    /// Updates (or creates) the document's Info dictionary. Only non-empty
    /// user fields are set; Creator, Producer and dates are always written.
    ///
    /// # Examples
    ///
    /// ```
    /// use doccat::config::Metadata;
    /// use doccat::merge::MetadataManager;
    /// use lopdf::Document;
    ///
    /// let mut doc = Document::with_version("1.5");
    /// let manager = MetadataManager::new();
    /// let metadata = Metadata::new(Some("Quarterly".to_string()), None, None, None);
    /// manager.set_metadata(&mut doc, &metadata);
    /// assert_eq!(manager.get_metadata(&doc).title.as_deref(), Some("Quarterly"));
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) {
        let mut info = self.take_info(doc);

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text_string(value));
            }
        }

        info.set("Creator", text_string(crate::NAME));
        info.set(
            "Producer",
            text_string(&format!("{} {}", crate::NAME, crate::VERSION)),
        );

        let date = format_pdf_date(SystemTime::now());
        if !info.has(b"CreationDate") {
            info.set("CreationDate", text_string(&date));
        }
        info.set("ModDate", text_string(&date));

        let info_id = self.info_id(doc).unwrap_or_else(|| doc.new_object_id());
        doc.objects.insert(info_id, Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    /// Get metadata from a document.
    ///
    /// Fields that are missing or not strings come back as `None`.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = self
            .info_id(doc)
            .and_then(|id| doc.get_dictionary(id).ok())
        else {
            return Metadata::default();
        };

        Metadata::new(
            string_field(info, b"Title"),
            string_field(info, b"Author"),
            string_field(info, b"Subject"),
            string_field(info, b"Keywords"),
        )
    }

    /// Read a single Info entry as text.
    pub fn get_field(&self, doc: &Document, key: &str) -> Option<String> {
        let info = doc.get_dictionary(self.info_id(doc)?).ok()?;
        string_field(info, key.as_bytes())
    }

    fn info_id(&self, doc: &Document) -> Option<ObjectId> {
        doc.trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .ok()
    }

    fn take_info(&self, doc: &Document) -> Dictionary {
        self.info_id(doc)
            .and_then(|id| doc.get_dictionary(id).ok())
            .cloned()
            .unwrap_or_else(Dictionary::new)
    }
}

/// Encode text as a PDF text string.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Decode a PDF text string (UTF-16BE with BOM, or single-byte).
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// Format a SystemTime as a PDF date string (`D:YYYYMMDDHHmmSSZ`, UTC).
fn format_pdf_date(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);

    format!(
        "D:{year:04}{month:02}{day:02}{:02}{:02}{:02}Z",
        rem / 3_600,
        (rem % 3_600) / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
