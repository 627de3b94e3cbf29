use image::{DynamicImage, RgbImage};
use verbale_pdf::{
    Branding, InspectionRecord, Language, Photo, ReportAssets, ReportOptions, Rotation,
    generate_report,
};

fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 128])
    }));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .unwrap();
    out
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |_, _| image::Rgb([10, 40, 90])));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn record_with_photos(n: usize) -> InspectionRecord {
    let mut rec = InspectionRecord::default();
    rec.serial = "007".into();
    rec.order_number = "C-101".into();
    rec.project_name = "Ponte Est".into();
    rec.works_inspected = "Giunti di dilatazione".into();
    rec.inspector = "L. Ferrari".into();
    rec.description = "Verifica <b>positiva</b> dei giunti, vedi <i>tavola 12</i>.".into();
    rec.methods.visual = true;
    rec.outcome.conformant = true;
    for i in 0..n {
        let mut photo = Photo::new(format!("photo-{i}"), jpeg_bytes(640, 480));
        photo.caption = format!("Giunto {}", i + 1);
        rec.photos.push(photo);
    }
    rec
}

fn page_count_marker(bytes: &[u8], count: u32) -> bool {
    let needle = format!("/Count {count}");
    bytes.windows(needle.len()).any(|w| w == needle.as_bytes())
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Inflate every FlateDecode stream in the file, in document order.
/// Payloads that are not zlib (DctDecode image data) are skipped.
fn inflated_streams(bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(start) = find(bytes, b"stream\n", pos) {
        let data_start = start + b"stream\n".len();
        let Some(end) = find(bytes, b"endstream", data_start) else {
            break;
        };
        let data = &bytes[data_start..end];
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
            out.push(String::from_utf8_lossy(&raw).into_owned());
        }
        pos = end + b"endstream".len();
    }
    out
}

fn footer_pages(bytes: &[u8], marker: &str) -> Vec<String> {
    inflated_streams(bytes)
        .into_iter()
        .filter(|s| s.contains(marker))
        .collect()
}

#[test]
fn single_page_report_without_photos() {
    let rec = record_with_photos(0);
    let bytes = generate_report(&rec, &ReportOptions::default()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(page_count_marker(&bytes, 1), "expected a one-page document");
}

#[test]
fn appendix_adds_one_page_per_two_photos() {
    for (photos, expected_pages) in [(1, 2), (2, 2), (3, 3), (5, 4)] {
        let rec = record_with_photos(photos);
        let bytes = generate_report(&rec, &ReportOptions::default()).unwrap();
        assert!(
            page_count_marker(&bytes, expected_pages),
            "{photos} photos should produce {expected_pages} pages"
        );
    }
}

#[test]
fn rotated_photos_render() {
    let mut rec = record_with_photos(2);
    rec.photos[0].rotation = Rotation::R90;
    rec.photos[1].rotation = Rotation::R180;
    let bytes = generate_report(&rec, &ReportOptions::default()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn undecodable_photo_keeps_slot_and_numbering() {
    let mut rec = record_with_photos(2);
    rec.photos.insert(1, Photo::new("broken", vec![1, 2, 3]));
    let bytes = generate_report(&rec, &ReportOptions::default()).unwrap();
    // the broken photo keeps its slot, so three photos still mean two appendix pages
    assert!(page_count_marker(&bytes, 3));
    // the last photo is still figure 3, not renumbered to 2
    let streams = inflated_streams(&bytes);
    assert!(streams.iter().any(|s| s.contains("Figura 3 - Giunto 2")));
    assert!(!streams.iter().any(|s| s.contains("Figura 2 - Giunto 2")));
}

#[test]
fn every_page_footer_shows_the_same_total() {
    let rec = record_with_photos(3);
    let bytes = generate_report(&rec, &ReportOptions::default()).unwrap();
    // one base page plus two appendix pages
    let footers = footer_pages(&bytes, "Pagina ");
    assert_eq!(footers.len(), 3);
    for (i, page) in footers.iter().enumerate() {
        let expected = format!("Pagina {} di 3", i + 1);
        assert!(page.contains(&expected), "page {} missing '{expected}'", i + 1);
    }
}

#[test]
fn english_footer_counts_pages_in_english() {
    let rec = record_with_photos(1);
    let opts = ReportOptions {
        language: Language::En,
        ..Default::default()
    };
    let bytes = generate_report(&rec, &opts).unwrap();
    let footers = footer_pages(&bytes, "Page ");
    assert_eq!(footers.len(), 2);
    for (i, page) in footers.iter().enumerate() {
        assert!(page.contains(&format!("Page {} of 2", i + 1)));
    }
}

#[test]
fn branding_assets_are_embedded() {
    let rec = record_with_photos(1);
    let opts = ReportOptions {
        language: Language::En,
        branding: Branding::Maestrale,
        assets: ReportAssets {
            logo: Some(png_bytes(280, 120)),
            signature: Some(png_bytes(300, 110)),
        },
        ..Default::default()
    };
    let bytes = generate_report(&rec, &opts).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(page_count_marker(&bytes, 2));
}

#[test]
fn record_json_round_trips() {
    let rec = record_with_photos(1);
    let json = serde_json::to_string(&rec).unwrap();
    let back: InspectionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.serial, "007");
    assert_eq!(back.photos.len(), 1);
    assert_eq!(back.photos[0].caption, "Giunto 1");
    assert_eq!(back.photos[0].rotation, Rotation::R0);
}
