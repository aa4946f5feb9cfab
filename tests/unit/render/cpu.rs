use super::*;
use crate::foundation::core::{Canvas, Point, Size};
use crate::render::metrics::{LayoutMetrics, TextMetrics};
use crate::render::scene::{Anchor, HitTarget};

const FONT_FIXTURE: &str = "tests/data/fonts/DejaVuSans.ttf";

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> Arc<PreparedImage> {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        bytes.extend_from_slice(&px);
    }
    Arc::new(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    })
}

fn backend(clear_rgba: Option<[u8; 4]>) -> CpuBackend {
    CpuBackend::new(RenderSettings { clear_rgba }, Arc::new(FontRegistry::empty()))
}

fn fixture_fonts(family: FontFamily) -> Arc<FontRegistry> {
    let mut fonts = FontRegistry::empty();
    fonts.insert(family, std::fs::read(FONT_FIXTURE).unwrap());
    Arc::new(fonts)
}

/// "Hello" at 20px, red fill with a blue outline, measured with `fonts`.
fn hello_node(fonts: &Arc<FontRegistry>, family: FontFamily, origin: Point) -> TextNode {
    TextNode {
        text: "Hello".to_owned(),
        origin,
        font_size_px: 20,
        font_family: family,
        fill: HexColor::rgb(255, 0, 0),
        stroke: HexColor::rgb(0, 0, 255),
        stroke_width: 1.0,
        scale_x: 1.0,
        size: LayoutMetrics::new(Arc::clone(fonts)).measure("Hello", family, 20),
    }
}

/// Bounding box of every non-transparent pixel, plus counts of red- and blue-dominant ones.
fn painted(frame: &FrameRGBA) -> (Option<Rect>, usize, usize) {
    let mut bbox: Option<Rect> = None;
    let (mut reddish, mut bluish) = (0, 0);
    for y in 0..frame.height {
        for x in 0..frame.width {
            let [r, _, b, a] = frame.pixel(x, y).unwrap();
            if a == 0 {
                continue;
            }
            let px = Rect::new(f64::from(x), f64::from(y), f64::from(x + 1), f64::from(y + 1));
            bbox = Some(bbox.map_or(px, |acc| acc.union(px)));
            if r > b {
                reddish += 1;
            } else if b > r {
                bluish += 1;
            }
        }
    }
    (bbox, reddish, bluish)
}

fn within(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

fn empty_scene(c: Canvas) -> Scene {
    Scene {
        canvas: c,
        background: None,
        text: None,
        handles: None,
    }
}

#[test]
fn empty_scene_without_clear_color_is_transparent() {
    let frame = backend(None).render_scene(&empty_scene(canvas(8, 8))).unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn clear_color_fills_the_whole_canvas() {
    let frame = backend(Some([255, 255, 255, 255]))
        .render_scene(&empty_scene(canvas(8, 8)))
        .unwrap();
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(7, 7), Some([255, 255, 255, 255]));
}

#[test]
fn background_is_scaled_into_its_destination_box() {
    let mut scene = empty_scene(canvas(16, 16));
    scene.background = Some(BackgroundLayer {
        image: solid(2, 2, [255, 0, 0, 255]),
        dest: Rect::from_origin_size(Point::ORIGIN, Size::new(8.0, 8.0)),
    });

    let frame = backend(None).render_scene(&scene).unwrap();
    assert_eq!(frame.pixel(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(12, 12), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(4, 12), Some([0, 0, 0, 0]));
}

#[test]
fn background_paint_is_reused_for_the_same_image() {
    let image = solid(2, 2, [0, 0, 255, 255]);
    let mut scene = empty_scene(canvas(4, 4));
    scene.background = Some(BackgroundLayer {
        image: Arc::clone(&image),
        dest: Rect::new(0.0, 0.0, 4.0, 4.0),
    });

    let mut be = backend(None);
    let a = be.render_scene(&scene).unwrap();
    let b = be.render_scene(&scene).unwrap();
    assert_eq!(a.data, b.data);
    assert!(
        be.image_cache
            .as_ref()
            .is_some_and(|(cached, _)| Arc::ptr_eq(cached, &image))
    );
}

#[test]
fn anchors_are_drawn_with_a_white_fill() {
    let mut scene = empty_scene(canvas(64, 64));
    scene.handles = Some(Handles {
        border: Rect::new(10.0, 20.0, 50.0, 40.0),
        left: Rect::new(5.0, 25.0, 15.0, 35.0),
        right: Rect::new(45.0, 25.0, 55.0, 35.0),
    });
    assert_eq!(
        scene.hit_test(Point::new(50.0, 30.0)),
        Some(HitTarget::Anchor(Anchor::Right))
    );

    let frame = backend(None).render_scene(&scene).unwrap();
    assert_eq!(frame.pixel(50, 30), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(9, 30), Some([255, 255, 255, 255]));
    // Inside the border, away from the anchors.
    assert_eq!(frame.pixel(30, 30), Some([0, 0, 0, 0]));
    let [_, g, b, a] = frame.pixel(30, 20).unwrap();
    assert!(a > 0 && b > g, "border pixel should be blue-ish");
}

#[test]
fn text_is_filled_and_stroked_inside_its_box() {
    let fonts = fixture_fonts(FontFamily::NanumBarunGothic);
    let node = hello_node(&fonts, FontFamily::NanumBarunGothic, Point::new(100.0, 200.0));
    let bounds = node.bounds();
    assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    let mut scene = empty_scene(canvas(300, 300));
    scene.text = Some(node);

    let frame = CpuBackend::new(RenderSettings::default(), fonts)
        .render_scene(&scene)
        .unwrap();
    let (bbox, reddish, bluish) = painted(&frame);
    let bbox = bbox.expect("text should paint pixels");
    assert!(
        within(bounds.inflate(2.0, 2.0), bbox),
        "paint {bbox:?} escapes node box {bounds:?}"
    );
    assert!(reddish > 0, "no fill pixels");
    assert!(bluish > 0, "no stroke pixels");
}

#[test]
fn zero_stroke_width_draws_fill_only() {
    let fonts = fixture_fonts(FontFamily::NanumBarunGothic);
    let mut node = hello_node(&fonts, FontFamily::NanumBarunGothic, Point::new(10.0, 10.0));
    node.stroke_width = 0.0;
    let mut scene = empty_scene(canvas(120, 60));
    scene.text = Some(node);

    let frame = CpuBackend::new(RenderSettings::default(), fonts)
        .render_scene(&scene)
        .unwrap();
    let (_, reddish, bluish) = painted(&frame);
    assert!(reddish > 0);
    assert_eq!(bluish, 0);
}

#[test]
fn unregistered_family_is_drawn_with_a_fallback_font() {
    let fonts = fixture_fonts(FontFamily::NanumBarunGothic);
    let node = hello_node(&fonts, FontFamily::NanumBrush, Point::new(10.0, 10.0));
    let bounds = node.bounds();
    let mut scene = empty_scene(canvas(120, 60));
    scene.text = Some(node);

    let mut be = CpuBackend::new(RenderSettings::default(), fonts);
    let frame = be.render_scene(&scene).unwrap();
    let (bbox, reddish, _) = painted(&frame);
    assert!(reddish > 0);
    assert!(within(bounds.inflate(2.0, 2.0), bbox.unwrap()));
    assert!(
        be.font_cache
            .get(&FontFamily::NanumBrush)
            .is_some_and(|(resolved, _)| *resolved == FontFamily::NanumBarunGothic)
    );
}

#[test]
fn text_without_any_registered_font_is_a_render_error() {
    let mut scene = empty_scene(canvas(64, 64));
    scene.text = Some(TextNode {
        text: "hi".to_owned(),
        origin: Point::new(4.0, 4.0),
        font_size_px: 20,
        font_family: FontFamily::NanumBrush,
        fill: HexColor::BLACK,
        stroke: HexColor::WHITE,
        stroke_width: 1.0,
        scale_x: 1.0,
        size: Size::new(24.0, 20.0),
    });

    let err = backend(None).render_scene(&scene).unwrap_err();
    assert!(matches!(err, OvertextError::Render(_)));
    assert!(err.to_string().contains("NanumBrush"));
}

#[test]
fn oversized_canvas_is_rejected() {
    let err = backend(None)
        .render_scene(&empty_scene(canvas(70_000, 1)))
        .unwrap_err();
    assert!(matches!(err, OvertextError::Render(_)));
}

#[test]
fn mismatched_image_bytes_are_rejected() {
    assert!(image_premul_bytes_to_pixmap(&[0; 12], 2, 2).is_err());
    assert!(image_premul_bytes_to_pixmap(&[0; 16], 2, 2).is_ok());
}
