//! Criterion benchmarks for mctex critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Importer: scanning and decoding textures from a mod archive
//! - Editor: rendering the magnified, outlined canvas
//! - Raster: image to pixel grid conversion
//! - Color: hex and CSS color parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{ImageFormat, Rgba, RgbaImage};
use mctex::color::parse_color;
use mctex::editor::{EditorOptions, EditorSession};
use mctex::importer::import_from_reader;
use mctex::raster::PixelGrid;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a noisy texture so PNG compression has real work to do
fn make_texture(size: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17) ^ seed) as u8;
        Rgba([v, v.wrapping_mul(3), v.wrapping_add(91), 255])
    })
}

/// Generate an in-memory mod archive with `count` textures
fn make_archive(count: usize, size: u32) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for i in 0..count {
        let mut png = Cursor::new(Vec::new());
        make_texture(size, i as u32).write_to(&mut png, ImageFormat::Png).unwrap();
        zip.start_file(format!("assets/bench/textures/block/t{}.png", i), options).unwrap();
        zip.write_all(png.get_ref()).unwrap();
        zip.start_file(format!("com/bench/C{}.class", i), options).unwrap();
        zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    for count in [16, 128] {
        let archive = make_archive(count, 16);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("textures_16px", count), &archive, |b, data| {
            b.iter(|| import_from_reader(Cursor::new(black_box(data.as_slice()))).unwrap())
        });
    }
    group.finish();
}

fn bench_editor_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor_render");
    for (size, pixel_size) in [(16, 16), (32, 16), (64, 8)] {
        let texture = make_texture(size, 7);
        let options = EditorOptions { pixel_size, ..Default::default() };
        let session = EditorSession::open_with(&texture, options);
        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_function(BenchmarkId::new(format!("{}px", size), pixel_size), |b| {
            b.iter(|| black_box(&session).render().unwrap())
        });
    }
    group.finish();
}

fn bench_editor_clicks(c: &mut Criterion) {
    let texture = make_texture(32, 3);
    c.bench_function("editor_click_sweep_32px", |b| {
        b.iter(|| {
            let mut session = EditorSession::open(&texture);
            for py in (0..512).step_by(7) {
                for px in (0..512).step_by(7) {
                    session.click(black_box(px), black_box(py));
                }
            }
            session.commit().unwrap()
        })
    });
}

fn bench_raster(c: &mut Criterion) {
    let texture = make_texture(64, 11);
    c.bench_function("raster_round_trip_64px", |b| {
        b.iter(|| PixelGrid::from_image(black_box(&texture)).into_image().unwrap())
    });
}

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_color");
    for input in ["#F00", "#A0A0A4", "#FF000080", "rebeccapurple", "rgb(10 20 30 / 50%)"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, s| {
            b.iter(|| parse_color(black_box(s)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_import,
    bench_editor_render,
    bench_editor_clicks,
    bench_raster,
    bench_color
);
criterion_main!(benches);
