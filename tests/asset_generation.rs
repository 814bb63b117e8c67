use teestudio::assets::raster::decode_frame;
use teestudio::assets::shapes::SHAPE_PALETTE;
use teestudio::assets::{ShapeKind, TextRenderer, TextStyle, generate_shape};
use teestudio::{Color, DataUrl};

fn decode(url: &DataUrl) -> teestudio::FrameRGBA {
    assert_eq!(url.mime(), "image/png");
    decode_frame(url.bytes()).unwrap()
}

#[test]
fn every_shape_in_every_palette_color_is_a_100px_png() {
    for kind in ShapeKind::ALL {
        for color in SHAPE_PALETTE {
            let frame = decode(&generate_shape(kind, color).unwrap());
            assert_eq!((frame.width, frame.height), (100, 100));
            assert!(frame.coverage() > 0, "{kind} in {color} is empty");
        }
    }
}

#[test]
fn shapes_keep_transparent_corners() {
    for kind in ShapeKind::ALL {
        let frame = decode(&generate_shape(kind, Color::BLACK).unwrap());
        assert_eq!(frame.pixel(0, 0).unwrap()[3], 0, "{kind}");
        assert_eq!(frame.pixel(99, 99).unwrap()[3], 0, "{kind}");
    }
}

#[test]
fn data_url_round_trips_through_its_string_form() {
    let url = generate_shape(ShapeKind::Heart, SHAPE_PALETTE[4]).unwrap();
    let text = url.to_string();
    assert!(text.starts_with("data:image/png;base64,"));
    let parsed: DataUrl = text.parse().unwrap();
    assert_eq!(parsed, url);
}

#[test]
fn text_is_rendered_into_the_fixed_canvas() {
    let renderer = TextRenderer::new();
    let style = TextStyle {
        size_px: 48.0,
        ..TextStyle::default()
    };
    let url = renderer.generate("Hola", &style).unwrap().unwrap();
    let frame = decode(&url);
    assert_eq!((frame.width, frame.height), (300, 100));
    assert_eq!(renderer.generate("\n\t ", &style).unwrap(), None);
}
