//! Shared helpers for building in-memory test PDFs.
//!
//! Pages are US Letter (612 x 792). Coordinates handed to the helpers are
//! PDF user space: the origin is the bottom-left corner and Y grows upward.
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Show `text` with its baseline at `(x, y)`, `size` points.
pub fn show_text(x: f32, y: f32, size: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Real(size)]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Show two lines from one text object: `first` at `(x, y)`, then `second`
/// one leading step below via TL / T*.
pub fn show_two_lines(x: f32, y: f32, size: f32, leading: f32, first: &str, second: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Real(size)]),
        Operation::new("TL", vec![Object::Real(leading)]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(first)]),
        Operation::new("T*", vec![]),
        Operation::new("Tj", vec![Object::string_literal(second)]),
        Operation::new("ET", vec![]),
    ]
}

/// Show a TJ array with a kerning adjustment between two strings.
pub fn show_tj(x: f32, y: f32, size: f32, first: &str, adjustment: i64, second: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Real(size)]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal(first),
                adjustment.into(),
                Object::string_literal(second),
            ])],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Draw the shared 1x1 image XObject scaled to `w` x `h` with its lower-left
/// corner at `(x, y)`.
pub fn show_image(x: f32, y: f32, w: f32, h: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(w),
                0.into(),
                0.into(),
                Object::Real(h),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Build a document with one page per element of `pages`.
pub fn build_pdf(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    build_pdf_inner(pages, None)
}

/// Build a one-page document carrying an information dictionary.
pub fn build_pdf_with_info(ops: Vec<Operation>, title: &str, author: &str, created: &str) -> Vec<u8> {
    build_pdf_inner(vec![ops], Some((title, author, created)))
}

/// Build a document whose single page has no Contents entry at all.
pub fn build_pdf_with_empty_page() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(doc)
}

fn build_pdf_inner(pages: Vec<Vec<Operation>>, info: Option<(&str, &str, &str)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8],
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for ops in pages {
        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some((title, author, created)) = info {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal(author),
            "CreationDate" => Object::string_literal(created),
        });
        doc.trailer.set("Info", info_id);
    }

    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    doc.compress();
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize test document");
    buf
}
