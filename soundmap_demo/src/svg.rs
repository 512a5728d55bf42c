// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of view surfaces for `soundmap_demo`.

use core::fmt::Write as _;

use kurbo::{Rect, Size};
use peniko::Brush;
use soundmap_core::{DisplayList, Primitive, TextAnchor, TextBaseline, TextPrimitive};
use soundmap_view::Tooltip;

const TOOLTIP_FONT_SIZE: f64 = 11.0;
const TOOLTIP_PADDING: f64 = 4.0;

/// Stacked layers of recorded primitives, bottom first, plus an optional tooltip.
#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    size: Size,
    layers: Vec<Vec<Primitive>>,
    tooltip: Option<Tooltip>,
}

impl SvgScene {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub(crate) fn push_layer(&mut self, surface: &DisplayList) {
        self.layers.push(surface.items().to_vec());
    }

    pub(crate) fn set_tooltip(&mut self, tooltip: &Tooltip) {
        self.tooltip = tooltip.is_visible().then(|| tooltip.clone());
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view = Rect::from_origin_size((0.0, 0.0), self.size);
        let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = write!(
            svg,
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = view.width(),
            h = view.height(),
        );
        svg.push_str("\n<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

        for layer in &self.layers {
            svg.push_str("<g>\n");
            for primitive in layer {
                write_primitive(&mut svg, primitive);
            }
            svg.push_str("</g>\n");
        }
        if let Some(tooltip) = &self.tooltip {
            write_tooltip(&mut svg, tooltip);
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn write_primitive(out: &mut String, primitive: &Primitive) {
    match primitive {
        Primitive::Disc {
            center,
            radius,
            fill,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                center.x, center.y, radius
            );
            write_paint_attr(out, "fill", fill);
            out.push_str("/>\n");
        }
        Primitive::Stroke { path, brush, width } => {
            let _ = write!(out, r#"<path d="{}" fill="none""#, path.to_svg());
            write_paint_attr(out, "stroke", brush);
            let _ = write!(out, r#" stroke-width="{width}""#);
            out.push_str("/>\n");
        }
        Primitive::Text(t) => write_text(out, t),
    }
}

fn write_text(out: &mut String, t: &TextPrimitive) {
    let baseline = match t.baseline {
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Middle => "middle",
        TextBaseline::Hanging => "hanging",
    };
    let anchor = match t.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="{size}" font-family="sans-serif" dominant-baseline="{baseline}" text-anchor="{anchor}""#,
        x = t.pos.x,
        y = t.pos.y,
        size = t.font_size,
    );
    write_paint_attr(out, "fill", &t.fill);
    let _ = writeln!(out, ">{}</text>", escape_xml(&t.text));
}

fn write_tooltip(out: &mut String, tooltip: &Tooltip) {
    // Rough box size: ~0.6em per glyph.
    let widest = tooltip
        .lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let line_height = 1.3 * TOOLTIP_FONT_SIZE;
    let w = 0.6 * TOOLTIP_FONT_SIZE * widest as f64 + 2.0 * TOOLTIP_PADDING;
    let h = line_height * tooltip.lines.len() as f64 + 2.0 * TOOLTIP_PADDING;
    let p = tooltip.position;

    let _ = writeln!(out, r#"<g opacity="{}">"#, tooltip.opacity);
    let _ = writeln!(
        out,
        r##"<rect x="{}" y="{}" width="{w}" height="{h}" rx="3" fill="#f5f5f5" stroke="#999999"/>"##,
        p.x, p.y
    );
    for (i, line) in tooltip.lines.iter().enumerate() {
        let y = p.y + TOOLTIP_PADDING + line_height * (i as f64 + 0.5);
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{y}" font-size="{TOOLTIP_FONT_SIZE}" font-family="sans-serif" dominant-baseline="middle" fill="#000000">{}</text>"##,
            p.x + TOOLTIP_PADDING,
            escape_xml(line)
        );
    }
    out.push_str("</g>\n");
}

/// Writes ` name="#rrggbb"`, plus ` name-opacity` when translucent. Gradients are not drawn.
fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let Brush::Solid(color) = brush else {
        let _ = write!(out, r#" {name}="none""#);
        return;
    };
    let rgba = color.to_rgba8();
    let _ = write!(
        out,
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    );
    if rgba.a < u8::MAX {
        let _ = write!(out, r#" {name}-opacity="{}""#, f64::from(rgba.a) / 255.0);
    }
}

fn escape_xml(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut acc, c| {
        match c {
            '&' => acc.push_str("&amp;"),
            '<' => acc.push_str("&lt;"),
            '>' => acc.push_str("&gt;"),
            '"' => acc.push_str("&quot;"),
            '\'' => acc.push_str("&apos;"),
            _ => acc.push(c),
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use peniko::color::palette::css;
    use soundmap_core::Surface;

    use super::*;

    #[test]
    fn layers_render_in_order() {
        let mut guides = DisplayList::new();
        guides.draw(Primitive::Text(TextPrimitive::new((1.0, 2.0), "a < b")));
        let mut content = DisplayList::new();
        content.draw(Primitive::Disc {
            center: Point::new(3.0, 4.0),
            radius: 1.5,
            fill: Brush::Solid(css::RED),
        });

        let mut scene = SvgScene::new(Size::new(10.0, 10.0));
        scene.push_layer(&guides);
        scene.push_layer(&content);
        let svg = scene.to_svg_string();

        let text = svg.find("a &lt; b").unwrap();
        let circle = svg.find(r##"<circle cx="3" cy="4" r="1.5" fill="#ff0000"/>"##).unwrap();
        assert!(text < circle);
    }

    #[test]
    fn hidden_tooltip_is_skipped() {
        let mut scene = SvgScene::new(Size::new(10.0, 10.0));
        scene.set_tooltip(&Tooltip::default());
        assert!(!scene.to_svg_string().contains("<g opacity"));
    }
}
