//! XML element trees and their depth-first rendering.
//!
//! XML inputs are parsed with `roxmltree` into an owned [`XmlElement`] tree
//! of tag, text and ordered children. Both output pipelines consume the
//! same pre-order traversal ([`XmlElement::preorder`]), one [`XmlLine`] per
//! element, carrying its nesting depth.
//!
//! Documents nested deeper than [`MAX_DEPTH`] are rejected before parsing.

/// Deepest element nesting accepted from an XML input.
pub const MAX_DEPTH: usize = 512;

/// Reasons an XML document cannot be turned into an element tree.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Not well-formed XML.
    #[error(transparent)]
    Malformed(#[from] roxmltree::Error),

    /// Elements nested past [`MAX_DEPTH`].
    #[error("Elements are nested deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit that was exceeded.
        limit: usize,
    },
}

/// One element of an XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name (namespace prefix dropped).
    pub tag: String,
    /// Direct text content, trimmed. Empty when the element has none.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

/// A single element in pre-order, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlLine {
    /// Nesting depth, 0 for the root.
    pub depth: usize,
    /// Element tag.
    pub tag: String,
    /// Element text (may be empty).
    pub text: String,
}

impl XmlLine {
    /// `tag: text`, or just `tag` when there is no text.
    pub fn label(&self) -> String {
        if self.text.is_empty() {
            self.tag.clone()
        } else {
            format!("{}: {}", self.tag, self.text)
        }
    }
}

impl XmlElement {
    /// Parse a document from a string and return its root element.
    ///
    /// # Errors
    ///
    /// [`XmlError::TooDeep`] when elements nest past [`MAX_DEPTH`], otherwise
    /// [`XmlError::Malformed`] for anything that is not well-formed.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        if nesting_depth(source) > MAX_DEPTH {
            return Err(XmlError::TooDeep { limit: MAX_DEPTH });
        }
        let doc = roxmltree::Document::parse(source)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let text = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            tag: node.tag_name().name().to_string(),
            text,
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(Self::from_node)
                .collect(),
        }
    }

    /// Depth-first, pre-order traversal of the tree.
    pub fn preorder(&self) -> Vec<XmlLine> {
        let mut lines = Vec::new();
        let mut stack = vec![(self, 0usize)];

        while let Some((element, depth)) = stack.pop() {
            lines.push(XmlLine {
                depth,
                tag: element.tag.clone(),
                text: element.text.clone(),
            });
            // Reverse so the first child is visited next.
            for child in element.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        lines
    }

    /// Total number of elements in the tree, root included.
    pub fn element_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(XmlElement::element_count)
            .sum::<usize>()
    }
}

/// Deepest element nesting in `source`, by a lexical scan of its tags.
///
/// Comments, CDATA sections, processing instructions and declarations are
/// skipped. The scan does not check well-formedness.
fn nesting_depth(source: &str) -> usize {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut i = 0;

    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'<') {
        let start = i + offset;
        let rest = &source[start..];

        let skip_to = |terminator: &str| {
            rest.find(terminator)
                .map_or(bytes.len(), |end| start + end + terminator.len())
        };

        i = if rest.starts_with("<!--") {
            skip_to("-->")
        } else if rest.starts_with("<![CDATA[") {
            skip_to("]]>")
        } else if rest.starts_with("<?") {
            skip_to("?>")
        } else if rest.starts_with("<!") {
            skip_to(">")
        } else if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
            skip_to(">")
        } else {
            let end = tag_end(bytes, start + 1);
            if end > 0 && bytes.get(end - 1) != Some(&b'/') {
                depth += 1;
                deepest = deepest.max(depth);
            }
            end + 1
        };

        if i >= bytes.len() {
            break;
        }
    }

    deepest
}

/// Index of the `>` closing a start tag, ignoring `>` inside quoted values.
fn tag_end(bytes: &[u8], from: usize) -> usize {
    let mut quote = None;
    for (offset, &b) in bytes[from..].iter().enumerate() {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if b == q => quote = None,
            (None, b'>') => return from + offset,
            _ => {}
        }
    }
    bytes.len()
}
