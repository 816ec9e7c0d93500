//! Benchmarks for pdfmark extraction performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a synthetic document with `page_count` pages of paragraph rows.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in 0..page_count {
        let mut ops = Vec::new();
        // Twenty well-separated paragraphs per page.
        for row in 0..20 {
            let y = 720.0 - row as f32 * 34.0;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec!["F1".into(), Object::Real(12.0)]));
            ops.push(Operation::new("Td", vec![Object::Real(72.0), Object::Real(y)]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!(
                    "Page {} paragraph {} with enough words to look like prose.",
                    page + 1,
                    row + 1
                ))],
            ));
            ops.push(Operation::new("ET", vec![]));
        }

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
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize bench document");
    buf
}

/// Benchmark header sniffing.
fn bench_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("sniff_valid_pdf", |b| {
        b.iter(|| pdfmark::detect::sniff(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("sniff_non_pdf", |b| {
        b.iter(|| pdfmark::detect::sniff(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark marked-text extraction at various sizes.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("marked_text");

    for page_count in [1, 5, 20].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pdfmark::extract_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detection, bench_extraction);
criterion_main!(benches);
