use criterion::{criterion_group, criterion_main, Criterion};

use bmp_export::{encode_bmp, RowPadding};

pub fn encode_frame(c: &mut Criterion) {
    let pixels = vec![0x80; 800 * 600 * 4];

    c.bench_function("encode 800x600", |b| {
        b.iter(|| encode_bmp(&pixels, 800, 600, RowPadding::None))
    });

    c.bench_function("encode 799x600 aligned", |b| {
        let pixels = &pixels[..799 * 600 * 4];
        b.iter(|| encode_bmp(pixels, 799, 600, RowPadding::Aligned))
    });
}

criterion_group!(benches, encode_frame);
criterion_main!(benches);
