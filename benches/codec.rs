use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qoif::{decode, decode_into, encode_to_vec, Channels};

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;

/// Smooth gradients with flat bands, close to what a screenshot looks like.
fn synthetic(channels: Channels) -> Vec<u8> {
    let count = channels.count();
    let mut pixels = Vec::with_capacity((WIDTH * HEIGHT) as usize * count);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let band = (x / 32) as u8;
            let rgba = [
                (x as u8).wrapping_mul(band),
                y as u8,
                band.wrapping_mul(40),
                if (x + y) % 64 == 0 { 128 } else { 255 },
            ];
            pixels.extend_from_slice(&rgba[..count]);
        }
    }
    pixels
}

fn bench_encode(c: &mut Criterion) {
    for (name, channels) in [("rgb", Channels::Rgb), ("rgba", Channels::Rgba)] {
        let pixels = synthetic(channels);
        c.bench_function(&format!("encode_{name}_256x256"), |b| {
            b.iter(|| encode_to_vec(black_box(&pixels), WIDTH, HEIGHT, channels).unwrap());
        });
    }
}

fn bench_decode(c: &mut Criterion) {
    let encoded = encode_to_vec(&synthetic(Channels::Rgba), WIDTH, HEIGHT, Channels::Rgba).unwrap();

    c.bench_function("decode_rgba_256x256", |b| {
        b.iter(|| decode(&mut black_box(encoded.as_slice())).unwrap());
    });

    c.bench_function("decode_into_rgba_256x256", |b| {
        let mut dest = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        b.iter(|| decode_into(&mut black_box(encoded.as_slice()), &mut dest).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
