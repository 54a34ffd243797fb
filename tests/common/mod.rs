#![allow(dead_code)]

use riddle::{ImageDownloader, QualityThreshold};
use std::io::Cursor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Thresholds low enough for small generated test images.
pub fn test_threshold() -> QualityThreshold {
    QualityThreshold {
        min_size_kb: 5,
        min_megapixels: 0.02,
        ..QualityThreshold::default()
    }
}

pub fn test_downloader() -> ImageDownloader {
    ImageDownloader::new(reqwest::Client::new(), &test_threshold())
}

/// PNG filled with noise so it does not compress below the size threshold.
pub fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x1234_5678;
    let img = image::RgbImage::from_fn(width, height, |_, _| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let b = seed.to_le_bytes();
        image::Rgb([b[1], b[2], b[3]])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// A 200x100 image (0.02 MP, ~60 KB) that passes [`test_threshold`].
pub fn good_png() -> Vec<u8> {
    noisy_png(200, 100)
}

pub async fn serve_bytes(server: &MockServer, at: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

pub async fn serve_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
