// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgdraw::*;

fn render(body: &str) -> Result<SvgDrawing, Error> {
    render_with(body, &Options::default())
}

fn render_with(body: &str, opt: &Options) -> Result<SvgDrawing, Error> {
    let text = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>{}</svg>",
        body
    );
    SvgDrawing::from_str(&text, opt)
}

fn only_child(group: &DrawingGroup) -> &Drawing {
    assert_eq!(group.children.len(), 1);
    &group.children[0]
}

fn as_geometry(drawing: &Drawing) -> &GeometryDrawing {
    match drawing {
        Drawing::Geometry(ref d) => d,
        Drawing::Group(_) => panic!("expected a geometry drawing"),
    }
}

fn as_group(drawing: &Drawing) -> &DrawingGroup {
    match drawing {
        Drawing::Group(ref g) => g,
        Drawing::Geometry(_) => panic!("expected a group"),
    }
}

fn solid_color(brush: Option<&Brush>) -> Color {
    match brush {
        Some(Brush::Solid(ref b)) => b.color,
        _ => panic!("expected a solid brush"),
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_xywh(x, y, w, h).unwrap()
}

#[test]
fn plain_circle() {
    let drawing = render("<circle cx='50' cy='50' r='40' fill='#ff0000'/>").unwrap();
    assert!(drawing.root.transform.is_none());

    let d = as_geometry(only_child(&drawing.root));
    assert_eq!(solid_color(d.brush.as_ref()), Color::from_linear(1.0, 1.0, 0.0, 0.0));
    assert!(d.pen.is_none());
    assert!(d.geometry.transform.is_none());
    assert_eq!(d.geometry.kind, GeometryKind::Stream);

    let bounds = drawing.bounds().unwrap();
    assert!((bounds.x() - 10.0).abs() < 0.01);
    assert!((bounds.width() - 80.0).abs() < 0.01);
}

#[test]
fn identity_transform_is_not_set() {
    let drawing = render(
        "<rect width='10' height='10' transform='matrix(1 0 0 1 0 0)'/>
         <rect width='10' height='10' transform='translate(0)'/>",
    )
    .unwrap();

    assert_eq!(drawing.root.children.len(), 2);
    for child in &drawing.root.children {
        let d = as_geometry(child);
        assert!(d.geometry.transform.is_none());
        assert!(d.brush.as_ref().and_then(|b| b.transform()).is_none());
    }
}

#[test]
fn shape_transform_is_propagated() {
    let drawing = render(
        "<rect width='10' height='10' transform='translate(5 5)' stroke='#000000'/>",
    )
    .unwrap();

    let d = as_geometry(only_child(&drawing.root));
    let ts = Transform::from_translate(5.0, 5.0);
    assert_eq!(d.geometry.transform, Some(DrawingTransform::Matrix(ts)));
    assert_eq!(d.brush.as_ref().and_then(|b| b.transform()), Some(&DrawingTransform::Matrix(ts)));
    assert_eq!(d.pen.as_ref().and_then(|p| p.brush.transform()), Some(&DrawingTransform::Matrix(ts)));
    assert_eq!(d.bounds(), Some(rect(5.0, 5.0, 10.0, 10.0)));
}

#[test]
fn gradient_transform_is_chained() {
    let drawing = render(
        "<linearGradient id='lg' gradientTransform='scale(2)'>
            <stop offset='0' stop-color='#000000'/>
            <stop offset='1' stop-color='#ffffff'/>
         </linearGradient>
         <rect width='10' height='10' fill='url(#lg)' transform='translate(5 0)'/>",
    )
    .unwrap();

    let d = as_geometry(only_child(&drawing.root));
    match d.brush {
        Some(Brush::LinearGradient(ref b)) => {
            assert_eq!(b.units, UnitSpace::ObjectBoundingBox);
            assert_eq!(b.stops.len(), 2);
            assert_eq!(
                b.transform,
                Some(DrawingTransform::Chain(vec![
                    Transform::from_scale(2.0, 2.0),
                    Transform::from_translate(5.0, 0.0),
                ]))
            );
        }
        _ => panic!("expected a linear gradient"),
    }
}

#[test]
fn bbox_clip_on_transformed_shape() {
    let drawing = render(
        "<clipPath id='c' clipPathUnits='objectBoundingBox'>
            <rect width='0.5' height='1'/>
         </clipPath>
         <rect width='10' height='10' transform='translate(5 5) scale(2)' clip-path='url(#c)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    assert!(g.transform.is_none());
    assert!(g.opacity_mask.is_none());

    let clip = g.clip_geometry.as_ref().unwrap();
    assert_eq!(
        clip.transform,
        Some(DrawingTransform::Chain(vec![
            Transform::from_scale(20.0, 20.0),
            Transform::from_translate(5.0, 5.0),
        ]))
    );

    let d = as_geometry(only_child(g));
    assert_eq!(
        d.geometry.transform,
        Some(DrawingTransform::Matrix(Transform::from_row(2.0, 0.0, 0.0, 2.0, 5.0, 5.0)))
    );

    assert_eq!(g.bounds(), Some(rect(5.0, 5.0, 10.0, 20.0)));
}

#[test]
fn bbox_clip_transform_is_applied_after_bbox() {
    let drawing = render(
        "<clipPath id='c' clipPathUnits='objectBoundingBox' transform='translate(1 0)'>
            <rect width='0.5' height='1'/>
         </clipPath>
         <rect x='10' y='10' width='40' height='40' clip-path='url(#c)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    let clip = g.clip_geometry.as_ref().unwrap();
    assert_eq!(
        clip.transform,
        Some(DrawingTransform::Chain(vec![
            Transform::from_scale(40.0, 40.0),
            Transform::from_translate(10.0, 10.0),
            Transform::from_translate(1.0, 0.0),
        ]))
    );
    assert_eq!(clip.bounds(), Some(rect(11.0, 10.0, 20.0, 40.0)));
    assert_eq!(g.bounds(), Some(rect(11.0, 10.0, 20.0, 40.0)));
}

#[test]
fn dropped_shape_does_not_take_id() {
    let doc = svgnode::Document::parse_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <clipPath id='c' clipPathUnits='objectBoundingBox'>
                <rect width='1' height='1'/>
            </clipPath>
            <line id='l' x1='0' y1='5' x2='10' y2='5' stroke='#000000' clip-path='url(#c)'/>
        </svg>",
    )
    .unwrap();

    let opt = Options::default();
    let mut ids = IdRegistry::new();
    let drawing = SvgDrawing::from_document_with_ids(&doc, &opt, &mut ids).unwrap();

    assert!(drawing.root.is_empty());
    assert!(drawing.find_by_name("l").is_none());
    assert!(!ids.contains("l"));
}

#[test]
fn user_space_clip() {
    let drawing = render(
        "<clipPath id='c' clip-rule='evenodd'>
            <rect width='20' height='20' clip-rule='evenodd'/>
         </clipPath>
         <rect width='50' height='50' transform='translate(10 0)' clip-path='url(#c)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    let clip = g.clip_geometry.as_ref().unwrap();
    assert_eq!(clip.fill_rule, FillRule::EvenOdd);
    assert_eq!(
        clip.transform,
        Some(DrawingTransform::Matrix(Transform::from_translate(10.0, 0.0)))
    );
    assert_eq!(g.bounds(), Some(rect(10.0, 0.0, 20.0, 20.0)));
}

#[test]
fn clip_path_children_are_not_rendered() {
    let drawing = render(
        "<clipPath id='c'><rect id='clip-rect' width='20' height='20'/></clipPath>
         <rect id='shape' width='50' height='50' clip-path='url(#c)'/>",
    )
    .unwrap();

    let geometries: Vec<_> = drawing
        .root
        .iter()
        .filter(|d| matches!(d, Drawing::Geometry(_)))
        .collect();
    assert_eq!(geometries.len(), 1);
    assert_eq!(geometries[0].name(), Some("shape"));
    assert!(drawing.find_by_name("clip-rect").is_none());
}

#[test]
fn bbox_mask_with_bbox_content() {
    let drawing = render(
        "<mask id='m' maskContentUnits='objectBoundingBox'>
            <rect width='1' height='1' fill='#0000ff'/>
         </mask>
         <rect x='10' y='20' width='30' height='40' fill='#ff0000' mask='url(#m)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    assert!(g.clip_geometry.is_none());

    let brush = match g.opacity_mask {
        Some(Brush::Drawing(ref b)) => b,
        _ => panic!("expected a drawing brush"),
    };

    let bbox = NonZeroRect::from_xywh(10.0, 20.0, 30.0, 40.0).unwrap();
    assert_eq!(
        brush.transform,
        Some(DrawingTransform::Matrix(Transform::from_bbox(bbox)))
    );
    assert!(brush.viewbox.is_none());
    assert!(brush.viewport.is_none());

    let content = as_geometry(only_child(&brush.drawing));
    assert_eq!(
        solid_color(content.brush.as_ref()),
        Color::from_linear(1.0, 0.5, 0.5, 0.5)
    );

    // The masked shape itself keeps its color.
    let d = as_geometry(only_child(g));
    assert_eq!(solid_color(d.brush.as_ref()), Color::from_linear(1.0, 1.0, 0.0, 0.0));
}

#[test]
fn bbox_mask_with_user_space_content() {
    let drawing = render(
        "<mask id='m'><rect width='100' height='100' fill='#ffffff'/></mask>
         <rect x='10' y='20' width='30' height='40' mask='url(#m)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    let brush = match g.opacity_mask {
        Some(Brush::Drawing(ref b)) => b,
        _ => panic!("expected a drawing brush"),
    };

    assert!(brush.transform.is_none());
    assert_eq!(brush.viewbox, Some(rect(10.0, 20.0, 30.0, 40.0)));
    assert_eq!(brush.viewport, Some(rect(10.0, 20.0, 30.0, 40.0)));
    assert_eq!(brush.viewbox_units, UnitSpace::UserSpace);
    assert_eq!(brush.viewport_units, UnitSpace::UserSpace);
    assert_eq!(brush.stretch, Stretch::Uniform);
}

#[test]
fn user_space_mask_is_not_desaturated() {
    let drawing = render(
        "<mask id='m' maskUnits='userSpaceOnUse'>
            <rect width='100' height='100' fill='#0000ff'/>
         </mask>
         <rect width='30' height='40' transform='translate(1 2)' mask='url(#m)'/>",
    )
    .unwrap();

    let g = as_group(only_child(&drawing.root));
    let brush = match g.opacity_mask {
        Some(Brush::Drawing(ref b)) => b,
        _ => panic!("expected a drawing brush"),
    };

    assert_eq!(
        brush.transform,
        Some(DrawingTransform::Matrix(Transform::from_translate(1.0, 2.0)))
    );

    let content = as_geometry(only_child(&brush.drawing));
    assert_eq!(
        solid_color(content.brush.as_ref()),
        Color::from_linear(1.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn pattern_inside_mask_is_an_error() {
    let res = render(
        "<pattern id='p' width='10' height='10' patternUnits='userSpaceOnUse'>
            <rect width='5' height='5'/>
         </pattern>
         <mask id='m'><rect width='100' height='100' fill='url(#p)'/></mask>
         <rect width='50' height='50' mask='url(#m)'/>",
    );

    assert!(matches!(res, Err(Error::UnsupportedBrush("drawing"))));
}

#[test]
fn runtime_metadata() {
    let body = "<rect id='a' class='big' width='10' height='10'/>";

    let drawing = render(body).unwrap();
    let d = as_geometry(only_child(&drawing.root));
    assert_eq!(d.name.as_deref(), Some("a"));
    assert!(d.metadata.is_empty());

    let opt = Options {
        include_runtime: true,
        ..Options::default()
    };
    let drawing = render_with(body, &opt).unwrap();
    let d = as_geometry(only_child(&drawing.root));
    assert_eq!(d.metadata.id.as_deref(), Some("a"));
    assert_eq!(d.metadata.class.as_deref(), Some("big"));
}

#[test]
fn unoptimized_geometry_keeps_figures() {
    let opt = Options {
        optimize_path: false,
        ..Options::default()
    };
    let drawing = render_with("<path d='M 0 0 L 10 0 L 10 10 Z M 20 20 L 30 20 L 30 30 Z'/>", &opt)
        .unwrap();

    let d = as_geometry(only_child(&drawing.root));
    assert_eq!(d.geometry.kind, GeometryKind::Figures);
    assert_eq!(d.geometry.figure_count(), 2);
}

#[test]
fn shared_id_registry() {
    let doc = svgnode::Document::parse_str(
        "<svg xmlns='http://www.w3.org/2000/svg'><rect id='a' width='10' height='10'/></svg>",
    )
    .unwrap();

    let opt = Options::default();
    let mut ids = IdRegistry::new();
    let first = SvgDrawing::from_document_with_ids(&doc, &opt, &mut ids).unwrap();
    let second = SvgDrawing::from_document_with_ids(&doc, &opt, &mut ids).unwrap();

    assert!(first.find_by_name("a").is_some());
    assert!(second.find_by_name("a").is_none());
    assert_eq!(ids.len(), 1);
}

#[test]
fn hidden_shapes_are_skipped() {
    let drawing = render(
        "<rect width='10' height='10' visibility='hidden'/>
         <g visibility='hidden'><rect width='10' height='10'/></g>
         <rect width='10' height='10' display='none'/>
         <rect width='10' height='10' fill='none'/>
         <rect width='0' height='10'/>",
    )
    .unwrap();

    assert!(drawing.root.is_empty());
}

#[test]
fn view_box_maps_to_root_transform() {
    let drawing = SvgDrawing::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' width='200' height='100' viewBox='0 0 20 10'>
            <rect width='20' height='10'/>
        </svg>",
        &Options::default(),
    )
    .unwrap();

    assert_eq!(
        drawing.root.transform,
        Some(DrawingTransform::Matrix(Transform::from_scale(10.0, 10.0)))
    );
    assert_eq!(drawing.bounds(), Some(rect(0.0, 0.0, 200.0, 100.0)));
}

#[test]
fn svgz_source() {
    use std::io::Write;

    let text = "<svg xmlns='http://www.w3.org/2000/svg'><rect width='10' height='10'/></svg>";
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let drawing = SvgDrawing::from_source(Source::Bytes(data), &Options::default()).unwrap();
    assert_eq!(drawing.root.children.len(), 1);
}
