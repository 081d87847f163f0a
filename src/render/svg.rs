use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::config::RenderOptions;
use crate::geometry::{Bounds, Point};
use crate::overlay::{Frame, Renderer, Transform};

const MASK_ID: &str = "isoverlay-inverse";

/// Renders frames into a standalone SVG document
///
/// Each band becomes one `<path>` holding its outer ring and holes, filled
/// with the even-odd rule so holes stay open. In inverse mode the viewport
/// is shaded instead, with the bands cut out through a mask.
#[derive(Debug)]
pub struct SvgRenderer {
    /// Markup of the last frame, `None` before the first render
    body: Option<String>,
    /// Pixel viewport of the last frame
    viewport: Bounds,
    transform: Transform,
    opacity: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self {
            body: None,
            viewport: Bounds::empty(),
            transform: Transform::identity(),
            opacity: 1.0,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The complete SVG for the last frame, including the current transform
    pub fn document(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        let vp = &self.viewport;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">"#,
            x = vp.south_west.x,
            y = vp.south_west.y,
            w = vp.width(),
            h = vp.height(),
        );
        svg.push('\n');
        svg.push_str(&format!(
            r#"<g opacity="{}"{}>"#,
            self.opacity,
            self.transform_attribute()
        ));
        svg.push('\n');
        svg.push_str(body);
        svg.push_str("</g>\n</svg>\n");
        Some(svg)
    }

    /// Write the current document to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        let Some(document) = self.document() else {
            bail!("Nothing has been rendered yet");
        };
        std::fs::write(path, document)
            .with_context(|| format!("Failed to write SVG file: {}", path.display()))
    }

    /// The current transform as an SVG attribute, scaling about its origin
    fn transform_attribute(&self) -> String {
        if self.transform.is_identity() {
            return String::new();
        }
        let t = self.transform;
        let origin = t.origin;
        format!(
            r#" transform="translate({} {}) translate({} {}) scale({}) translate({} {})""#,
            t.translate.x, t.translate.y, origin.x, origin.y, t.scale, -origin.x, -origin.y
        )
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &Frame, options: &RenderOptions) {
        let precision = options.svg_precision;
        let mut body = String::new();

        if options.inverse {
            let vp = &frame.pixel_viewport;
            let rect = format!(
                r#"x="{}" y="{}" width="{}" height="{}""#,
                vp.south_west.x,
                vp.south_west.y,
                vp.width(),
                vp.height()
            );

            body.push_str(&format!(
                "<defs><mask id=\"{}\">\n<rect {} fill=\"white\"/>\n",
                MASK_ID, rect
            ));
            for shape in &frame.shapes {
                body.push_str(&format!(
                    r#"<path d="{}" fill="black" fill-rule="evenodd"/>"#,
                    path_data(&shape.rings, precision)
                ));
                body.push('\n');
            }
            body.push_str("</mask></defs>\n");
            body.push_str(&format!(
                r#"<rect {} fill="{}" mask="url(#{})"/>"#,
                rect, options.inverse_color, MASK_ID
            ));
            body.push('\n');
        } else {
            for shape in &frame.shapes {
                let color = options.color_for(shape.travel_time);
                body.push_str(&format!(
                    r#"<path d="{}" fill="{color}" stroke="{color}" stroke-width="{}" stroke-linejoin="round" fill-rule="evenodd" data-travel-time="{}"/>"#,
                    path_data(&shape.rings, precision),
                    options.stroke_width,
                    shape.travel_time,
                ));
                body.push('\n');
            }
        }

        self.viewport = frame.pixel_viewport;
        self.body = Some(body);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn release(&mut self) {
        self.body = None;
        self.transform = Transform::identity();
    }
}

/// `M x,y L x,y ... Z` for every ring
fn path_data(rings: &[Vec<Point>], precision: usize) -> String {
    let mut d = String::new();
    for ring in rings {
        for (i, p) in ring.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            d.push_str(&format!("{}{:.*},{:.*}", command, precision, p.x, precision, p.y));
        }
        if !ring.is_empty() {
            d.push('Z');
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::PixelShape;
    use std::fs;
    use tempfile::tempdir;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x, y + size),
            Point::new(x + size, y + size),
            Point::new(x + size, y),
        ]
    }

    fn shape(travel_time: f64, rings: Vec<Vec<Point>>) -> PixelShape {
        let mut bounds = Bounds::empty();
        for ring in &rings {
            bounds.expand(&Bounds::from_points(ring));
        }
        PixelShape {
            travel_time,
            rings,
            bounds,
        }
    }

    fn frame(shapes: Vec<PixelShape>) -> Frame {
        let pixels = Bounds::new(Point::new(0.0, 0.0), Point::new(800.0, 600.0));
        Frame {
            zoom: 12.0,
            viewport: Bounds::new(Point::new(10.0, 10.0), Point::new(11.0, 10.75)),
            pixel_viewport: pixels,
            recenter: true,
            shapes,
        }
    }

    #[test]
    fn test_path_data() {
        let d = path_data(&[square(0.0, 0.0, 1.5)], 1);
        assert_eq!(d, "M0.0,0.0L0.0,1.5L1.5,1.5L1.5,0.0Z");

        let d = path_data(&[square(0.0, 0.0, 10.0), square(2.0, 2.0, 1.0)], 0);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn test_nothing_rendered() {
        let renderer = SvgRenderer::new();
        assert!(renderer.document().is_none());

        let dir = tempdir().unwrap();
        assert!(renderer.write(&dir.path().join("empty.svg")).is_err());
    }

    #[test]
    fn test_bands_get_colors() {
        let mut renderer = SvgRenderer::new();
        let options = RenderOptions::default();
        renderer.render(
            &frame(vec![
                shape(600.0, vec![square(0.0, 0.0, 100.0)]),
                shape(300.0, vec![square(10.0, 10.0, 50.0), square(20.0, 20.0, 5.0)]),
            ]),
            &options,
        );

        let svg = renderer.document().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains(r##"fill="#39B54A""##));
        assert!(svg.contains(r##"fill="#006837""##));
        assert!(svg.contains(r#"stroke-width="20""#));
        assert!(svg.contains(r#"data-travel-time="300""#));
        // Larger band first so the smaller one paints on top
        assert!(svg.find("#39B54A").unwrap() < svg.find("#006837").unwrap());
        assert!(!svg.contains("transform="));
    }

    #[test]
    fn test_inverse_uses_mask() {
        let mut renderer = SvgRenderer::new();
        let options = RenderOptions {
            inverse: true,
            ..Default::default()
        };
        renderer.render(&frame(vec![shape(600.0, vec![square(0.0, 0.0, 100.0)])]), &options);

        let svg = renderer.document().unwrap();
        assert!(svg.contains(r#"<mask id="isoverlay-inverse">"#));
        assert!(svg.contains(r#"mask="url(#isoverlay-inverse)""#));
        assert!(svg.contains(r##"fill="#333333""##));
        assert!(!svg.contains("#39B54A"));
    }

    #[test]
    fn test_transform_about_origin() {
        let mut renderer = SvgRenderer::new();
        renderer.render(&frame(Vec::new()), &RenderOptions::default());
        renderer.set_transform(Transform {
            translate: Point::new(4.0, -2.0),
            scale: 2.0,
            origin: Point::new(400.0, 300.0),
        });

        let svg = renderer.document().unwrap();
        assert!(svg.contains(
            r#"transform="translate(4 -2) translate(400 300) scale(2) translate(-400 -300)""#
        ));

        renderer.set_transform(Transform::identity());
        assert!(!renderer.document().unwrap().contains("transform="));
    }

    #[test]
    fn test_transform_attribute_matches_apply() {
        let mut renderer = SvgRenderer::new();
        renderer.render(&frame(Vec::new()), &RenderOptions::default());
        let transform = Transform {
            translate: Point::new(-30.0, 12.0),
            scale: 0.5,
            origin: Point::new(100.0, 60.0),
        };
        renderer.set_transform(transform);

        // translate(t) translate(o) scale(s) translate(-o), evaluated right to left
        let p = Point::new(250.0, 20.0);
        let by_attribute = Point::new(
            transform.translate.x + transform.origin.x + transform.scale * (p.x - transform.origin.x),
            transform.translate.y + transform.origin.y + transform.scale * (p.y - transform.origin.y),
        );
        assert_eq!(transform.apply(p), by_attribute);
        assert!(renderer.document().unwrap().contains(
            r#"transform="translate(-30 12) translate(100 60) scale(0.5) translate(-100 -60)""#
        ));
    }

    #[test]
    fn test_opacity_and_release() {
        let mut renderer = SvgRenderer::new();
        renderer.set_opacity(0.25);
        renderer.render(&frame(Vec::new()), &RenderOptions::default());
        assert!(renderer.document().unwrap().contains(r#"<g opacity="0.25">"#));

        renderer.release();
        assert!(renderer.document().is_none());
        assert!(renderer.transform().is_identity());
    }

    #[test]
    fn test_write_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bands.svg");

        let mut renderer = SvgRenderer::new();
        renderer.render(
            &frame(vec![shape(300.0, vec![square(0.0, 0.0, 10.0)])]),
            &RenderOptions::default(),
        );
        renderer.write(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, renderer.document().unwrap());
    }
}
