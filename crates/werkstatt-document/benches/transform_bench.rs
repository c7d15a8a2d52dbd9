// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the werkstatt-document pipelines: separable box
// blur, resampled rotation, and PDF page derivation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, Stream, dictionary};

use werkstatt_document::{DocumentHandle, ImageProcessor, PageHandle, PixelBuffer, TransformParameters};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn photo(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    }))
}

fn document(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), b"q Q".to_vec()));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    let _ = doc.save_to(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Box blur at radius 8 on a 512x512 image. Cost is independent of radius.
fn bench_box_blur(c: &mut Criterion) {
    let processor = ImageProcessor::new();
    let buffer = photo(512, 512);
    let params = TransformParameters::Blur { radius: 8 };

    c.bench_function("box_blur r=8 (512x512)", |b| {
        b.iter(|| black_box(processor.apply(black_box(buffer.clone()), &params)));
    });
}

/// Bilinear rotation by 30 degrees, which cannot take the quarter-turn path.
fn bench_rotate(c: &mut Criterion) {
    let processor = ImageProcessor::new();
    let buffer = photo(256, 256);
    let params = TransformParameters::Rotate { degrees: 30.0 };

    c.bench_function("rotate 30deg (256x256)", |b| {
        b.iter(|| black_box(processor.apply(black_box(buffer.clone()), &params)));
    });
}

/// Reverse a 100-page document and serialise it.
fn bench_derive(c: &mut Criterion) {
    let handle = match DocumentHandle::load(&document(100)) {
        Ok(handle) => handle,
        Err(err) => panic!("fixture document failed to load: {err}"),
    };
    let reversed: Vec<PageHandle> = (0..100).rev().map(|i| PageHandle::new(i, 0)).collect();

    c.bench_function("derive reversed (100 pages)", |b| {
        b.iter(|| black_box(handle.derive(black_box(&reversed)).and_then(|d| d.to_bytes())));
    });
}

criterion_group!(benches, bench_box_blur, bench_rotate, bench_derive);
criterion_main!(benches);
