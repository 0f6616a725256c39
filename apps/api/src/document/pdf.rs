use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

use super::page_text::{number, page_glyphs, resolve, text_in_rect, Rect};
use super::{DocumentError, DocumentExtractor, ExtractedDocument, Hyperlink};

/// Link labels are read from the page text inside the link's `/Rect` grown by
/// this many points on every side.
pub const LINK_TEXT_MARGIN: f32 = 5.0;

/// PDF decoder: text through `pdf-extract`, link annotations through `lopdf`.
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentError> {
        let bytes = std::fs::read(path)?;

        // lopdf rejects non-PDF input with an error; pdf-extract is not as polite
        let document =
            Document::load_mem(&bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?;

        let text = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes)))
            .map_err(|_| DocumentError::Pdf("text extraction panicked".to_string()))?
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;

        let hyperlinks = extract_hyperlinks(&document);
        debug!(
            "Extracted {} chars and {} hyperlinks from {}",
            text.len(),
            hyperlinks.len(),
            path.display()
        );

        Ok(ExtractedDocument { text, hyperlinks })
    }
}

/// Collects every `/Link` annotation with a `/URI` action, in page order.
/// A malformed annotation is skipped; it never fails the whole document.
///
/// The link text is the page text under the link's rectangle, or the
/// annotation's `/Contents` when nothing is drawn there.
pub fn extract_hyperlinks(document: &Document) -> Vec<Hyperlink> {
    let mut links = Vec::new();

    for (page_number, page_id) in document.get_pages() {
        let page = match document.get_dictionary(page_id) {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping page {page_number}: {e}");
                continue;
            }
        };

        let annotations = match page.get(b"Annots").map(|annots| resolve(document, annots)) {
            Ok(Object::Array(items)) => items,
            _ => continue,
        };

        let mut glyphs = None;
        for annotation in annotations {
            let Object::Dictionary(annotation) = resolve(document, annotation) else {
                continue;
            };
            let Some(uri) = link_uri(document, annotation) else {
                continue;
            };

            let rect = link_rect(document, annotation);
            let drawn_text = rect
                .map(|rect| {
                    let glyphs = glyphs.get_or_insert_with(|| page_glyphs(document, page_id));
                    text_in_rect(glyphs, &rect.expanded(LINK_TEXT_MARGIN))
                })
                .filter(|text| !text.is_empty());
            let text = drawn_text
                .or_else(|| {
                    annotation
                        .get(b"Contents")
                        .ok()
                        .and_then(|c| pdf_string(resolve(document, c)))
                })
                .unwrap_or_default();

            links.push(Hyperlink {
                uri,
                text,
                page: page_number.saturating_sub(1),
                rect,
            });
        }
    }

    links
}

fn link_rect(document: &Document, annotation: &Dictionary) -> Option<Rect> {
    let Object::Array(corners) = resolve(document, annotation.get(b"Rect").ok()?) else {
        return None;
    };
    let corners: Vec<f32> = corners
        .iter()
        .filter_map(|c| number(resolve(document, c)))
        .collect();
    match corners.as_slice() {
        [x0, y0, x1, y1] => Some(Rect::from_corners(*x0, *y0, *x1, *y1)),
        _ => None,
    }
}

fn link_uri(document: &Document, annotation: &Dictionary) -> Option<String> {
    match annotation.get(b"Subtype").ok()? {
        Object::Name(name) if name.as_slice() == b"Link" => {}
        _ => return None,
    }
    let Object::Dictionary(action) = resolve(document, annotation.get(b"A").ok()?) else {
        return None;
    };
    let uri = pdf_string(resolve(document, action.get(b"URI").ok()?))?;
    let uri = uri.trim();
    (!uri.is_empty()).then(|| uri.to_string())
}

/// Decodes a PDF string object, honouring a UTF-16BE byte order mark.
fn pdf_string(object: &Object) -> Option<String> {
    let Object::String(bytes, _) = object else {
        return None;
    };
    let text = match bytes.strip_prefix(&[0xfe_u8, 0xff]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    };
    Some(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::contact::extract_contact_info;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream, StringFormat};

    fn uri_action(uri: &str) -> Object {
        Object::Dictionary(dictionary! {
            "S" => "URI",
            "URI" => Object::String(uri.as_bytes().to_vec(), StringFormat::Literal),
        })
    }

    /// Two pages: a mailto link and an unlabelled web link on the first, a
    /// labelled link on the second, plus a non-link annotation to ignore.
    fn document_with_links() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mailto = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "A" => uri_action("mailto:jane@doe.dev"),
        });
        let web = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "A" => uri_action("https://jane.dev"),
        });
        let note = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "Contents" => Object::string_literal("just a note"),
        });
        let page_one = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Annots" => vec![mailto.into(), web.into(), note.into()],
        });

        let labelled = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Contents" => Object::string_literal("GitHub"),
            "A" => uri_action("https://github.com/jane"),
        });
        let page_two = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Annots" => vec![labelled.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_one.into(), page_two.into()],
                "Count" => 2,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_link_annotations_in_page_order() {
        let links = extract_hyperlinks(&document_with_links());
        assert_eq!(
            links,
            vec![
                Hyperlink {
                    uri: "mailto:jane@doe.dev".to_string(),
                    text: String::new(),
                    page: 0,
                    rect: None,
                },
                Hyperlink {
                    uri: "https://jane.dev".to_string(),
                    text: String::new(),
                    page: 0,
                    rect: None,
                },
                Hyperlink {
                    uri: "https://github.com/jane".to_string(),
                    text: "GitHub".to_string(),
                    page: 1,
                    rect: None,
                },
            ]
        );
    }

    /// One page that draws "LinkedIn" at (72, 700) in 10pt text, with three
    /// links: one over the drawn label, one over blank space carrying only
    /// `/Contents`, and one over blank space with no label at all.
    fn document_with_drawn_labels() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("LinkedIn")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let over_label = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![70.into(), 696.into(), 112.into(), 710.into()],
            "A" => uri_action("https://lnkd.in/abc"),
        });
        let described = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![300.into(), 600.into(), 360.into(), 612.into()],
            "Contents" => Object::string_literal("Portfolio"),
            "A" => uri_action("https://jane.design"),
        });
        let bare = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![300.into(), 400.into(), 360.into(), 412.into()],
            "A" => uri_action("https://example.org/talk"),
        });
        let page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "Annots" => vec![over_label.into(), described.into(), bare.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_link_text_is_read_from_drawn_label_then_contents() {
        let links = extract_hyperlinks(&document_with_drawn_labels());

        let texts: Vec<&str> = links.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["LinkedIn", "Portfolio", ""]);
        assert_eq!(links[0].rect, Some(Rect::from_corners(70.0, 696.0, 112.0, 710.0)));
    }

    #[test]
    fn test_drawn_label_routes_shortened_link_to_linkedin() {
        let links = extract_hyperlinks(&document_with_drawn_labels());
        let contact = extract_contact_info("", &links);

        assert_eq!(contact.linkedin.as_deref(), Some("https://lnkd.in/abc"));
        assert_eq!(contact.portfolio.as_deref(), Some("https://jane.design"));
        assert_eq!(contact.other_links, vec!["https://example.org/talk"]);
    }

    #[test]
    fn test_document_without_annotations_has_no_links() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        assert!(extract_hyperlinks(&doc).is_empty());
    }

    #[test]
    fn test_pdf_string_utf16() {
        let bytes = vec![0xfe, 0xff, 0x00, 0x48, 0x00, 0x69];
        let object = Object::String(bytes, StringFormat::Hexadecimal);
        assert_eq!(pdf_string(&object).as_deref(), Some("Hi"));
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"definitely not a pdf").unwrap();
        let err = PdfExtractor.extract(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }
}
