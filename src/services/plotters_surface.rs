use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::services::drawing_surface::{Color, DrawingSurface, Point, SurfaceError, TextAlign};

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: i32 = 12;
/// Angular resolution of the polygon approximating a pie slice.
const ARC_STEP: f64 = PI / 90.0;

/// Draws chart primitives through a plotters backend (PNG or SVG file).
///
/// Every frame opens a fresh backend on `clear` and writes the file on
/// `present`, so redrawing replaces the previous image.
pub struct PlottersSurface<'a, DB: DrawingBackend> {
    path: &'a Path,
    size: (u32, u32),
    open: fn(&'a Path, (u32, u32)) -> DB,
    area: Option<DrawingArea<DB, Shift>>,
}

impl<'a> PlottersSurface<'a, BitMapBackend<'a>> {
    pub fn png(path: &'a Path, size: (u32, u32)) -> Self {
        Self::new(path, size, |path, size| BitMapBackend::new(path, size))
    }
}

impl<'a> PlottersSurface<'a, SVGBackend<'a>> {
    pub fn svg(path: &'a Path, size: (u32, u32)) -> Self {
        Self::new(path, size, |path, size| SVGBackend::new(path, size))
    }
}

impl<'a, DB: DrawingBackend> PlottersSurface<'a, DB> {
    fn new(path: &'a Path, size: (u32, u32), open: fn(&'a Path, (u32, u32)) -> DB) -> Self {
        Self {
            path,
            size,
            open,
            area: None,
        }
    }

    fn area(&mut self) -> &DrawingArea<DB, Shift> {
        let (open, path, size) = (self.open, self.path, self.size);
        self.area
            .get_or_insert_with(|| open(path, size).into_drawing_area())
    }
}

fn draw_error<E: Display>(error: E) -> SurfaceError {
    SurfaceError::Draw(error.to_string())
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn pixel(point: Point) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

fn sector_outline(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Vec<(i32, i32)> {
    let steps = ((end_angle - start_angle) / ARC_STEP).ceil().max(2.0) as usize;
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push(pixel(center));
    for step in 0..=steps {
        let angle = start_angle + (end_angle - start_angle) * step as f64 / steps as f64;
        outline.push(pixel((
            center.0 + radius * angle.cos(),
            center.1 + radius * angle.sin(),
        )));
    }
    outline
}

impl<DB: DrawingBackend> DrawingSurface for PlottersSurface<'_, DB> {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.area = None;
        self.area().fill(&WHITE).map_err(draw_error)
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        color: Color,
        width: u32,
    ) -> Result<(), SurfaceError> {
        let path: Vec<(i32, i32)> = points.iter().copied().map(pixel).collect();
        let style = ShapeStyle::from(&rgb(color)).stroke_width(width);
        self.area()
            .draw(&PathElement::new(path, style))
            .map_err(draw_error)
    }

    fn fill_rect(
        &mut self,
        top_left: Point,
        size: (f64, f64),
        color: Color,
    ) -> Result<(), SurfaceError> {
        let bottom_right = (top_left.0 + size.0, top_left.1 + size.1);
        let style = ShapeStyle::from(&rgb(color)).filled();
        self.area()
            .draw(&Rectangle::new([pixel(top_left), pixel(bottom_right)], style))
            .map_err(draw_error)
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let style = ShapeStyle::from(&rgb(color)).filled();
        self.area()
            .draw(&Circle::new(pixel(center), radius.round() as i32, style))
            .map_err(draw_error)
    }

    fn fill_sector(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let style = ShapeStyle::from(&rgb(color)).filled();
        let outline = sector_outline(center, radius, start_angle, end_angle);
        self.area()
            .draw(&Polygon::new(outline, style))
            .map_err(draw_error)
    }

    fn fill_text(
        &mut self,
        text: &str,
        anchor: Point,
        align: TextAlign,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if text.is_empty() {
            return Ok(());
        }
        let horizontal = match align {
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let style = (FONT_FAMILY, FONT_SIZE)
            .into_font()
            .color(&rgb(color))
            .pos(Pos::new(horizontal, VPos::Bottom));
        self.area()
            .draw(&Text::new(text.to_string(), pixel(anchor), style))
            .map_err(draw_error)
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        match self.area.take() {
            Some(area) => area.present().map_err(draw_error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simple_chart::{Chart, ChartConfig, ChartPoint, SimpleChart};
    use crate::services::drawing_surface::SurfaceSet;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[test]
    fn sector_outline_starts_at_center_and_follows_arc() {
        let outline = sector_outline((100.0, 100.0), 50.0, 0.0, PI / 2.0);
        assert_eq!(outline[0], (100, 100));
        assert_eq!(outline[1], (150, 100));
        assert_eq!(*outline.last().unwrap(), (100, 150));
    }

    #[test]
    fn bar_chart_renders_to_png_file() {
        let output_file = assert_fs::NamedTempFile::new("resources.png").unwrap();
        let mut surfaces = SurfaceSet::new();
        surfaces.insert(
            "resourceChart",
            PlottersSurface::png(output_file.path(), (500, 300)),
        );

        let data = vec![
            ChartPoint::labelled("2026-W7", 120.0, Some("#2563eb")),
            ChartPoint::labelled("2026-W8", 96.0, Some("#2563eb")),
        ];
        SimpleChart::bind(
            &mut surfaces,
            "resourceChart",
            ChartConfig::new(Chart::bar(data)).with_size(500, 300),
        )
        .unwrap();

        output_file.assert(predicate::path::exists());
        let metadata = std::fs::metadata(output_file.path()).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn redrawing_an_svg_replaces_the_file_contents() {
        let output_file = assert_fs::NamedTempFile::new("productivity.svg").unwrap();
        let mut surfaces = SurfaceSet::new();
        surfaces.insert(
            "productivityChart",
            PlottersSurface::svg(output_file.path(), (400, 300)),
        );

        let mut chart = SimpleChart::bind(
            &mut surfaces,
            "productivityChart",
            ChartConfig::new(Chart::line(
                vec![ChartPoint::from(1.0), ChartPoint::from(2.0)],
                vec!["Feb 16".to_string(), "Feb 17".to_string()],
            )),
        )
        .unwrap();
        output_file.assert(predicate::str::contains("Feb 16"));

        chart
            .update_data(
                vec![ChartPoint::from(3.0), ChartPoint::from(4.0)],
                vec!["Mar 02".to_string(), "Mar 03".to_string()],
            )
            .unwrap();

        output_file.assert(predicate::str::contains("Mar 02"));
        output_file.assert(predicate::str::contains("Feb 16").not());
    }
}
