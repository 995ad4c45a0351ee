use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::drawing_surface::{
    Color, DrawingSurface, Point, SurfaceError, SurfaceSet, TextAlign,
};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;
const PADDING: f64 = 40.0;
const GRID_LINES: usize = 5;
const MAX_X_LABELS: usize = 5;
const POINT_RADIUS: f64 = 4.0;
const BAR_FILL_RATIO: f64 = 0.8;
const PIE_LABEL_OFFSET: f64 = 20.0;

const GRID_COLOR: Color = Color::rgb(0xe2, 0xe8, 0xf0);
const AXIS_TEXT_COLOR: Color = Color::rgb(0x64, 0x74, 0x8b);
const VALUE_TEXT_COLOR: Color = Color::rgb(0x1e, 0x29, 0x3b);
const SERIES_COLOR: Color = Color::rgb(0x25, 0x63, 0xeb);
const PALETTE: [Color; 6] = [
    Color::rgb(0x25, 0x63, 0xeb),
    Color::rgb(0x10, 0xb9, 0x81),
    Color::rgb(0xf5, 0x9e, 0x0b),
    Color::rgb(0xef, 0x44, 0x44),
    Color::rgb(0x8b, 0x5c, 0xf6),
    Color::rgb(0x06, 0xb6, 0xd4),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// A raw number or an object exposing `value`; a missing value reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    Number(f64),
    Datum(ChartDatum),
}

impl ChartPoint {
    pub fn labelled(label: impl Into<String>, value: f64, color: Option<&str>) -> Self {
        ChartPoint::Datum(ChartDatum {
            value: Some(value),
            label: Some(label.into()),
            color: color.map(str::to_string),
            date: None,
        })
    }

    pub fn dated(date: impl Into<String>, value: f64) -> Self {
        ChartPoint::Datum(ChartDatum {
            value: Some(value),
            label: None,
            color: None,
            date: Some(date.into()),
        })
    }

    pub fn value(&self) -> f64 {
        match self {
            ChartPoint::Number(value) => *value,
            ChartPoint::Datum(datum) => datum.value.unwrap_or(0.0),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ChartPoint::Number(_) => "",
            ChartPoint::Datum(datum) => datum.label.as_deref().unwrap_or(""),
        }
    }

    fn color(&self) -> Option<Color> {
        match self {
            ChartPoint::Number(_) => None,
            ChartPoint::Datum(datum) => datum.color.as_deref().and_then(Color::from_hex),
        }
    }
}

impl From<f64> for ChartPoint {
    fn from(value: f64) -> Self {
        ChartPoint::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub data: Vec<ChartPoint>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub data: Vec<ChartPoint>,
}

/// Chart kinds. Each render derives its scale from the current data.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
    Pie(PieChart),
}

impl Chart {
    pub fn line(data: Vec<ChartPoint>, labels: Vec<String>) -> Self {
        Chart::Line(LineChart { data, labels })
    }

    pub fn bar(data: Vec<ChartPoint>) -> Self {
        Chart::Bar(BarChart { data })
    }

    pub fn pie(data: Vec<ChartPoint>) -> Self {
        Chart::Pie(PieChart { data })
    }

    pub fn data(&self) -> &[ChartPoint] {
        match self {
            Chart::Line(chart) => &chart.data,
            Chart::Bar(chart) => &chart.data,
            Chart::Pie(chart) => &chart.data,
        }
    }

    /// Labels are kept when `labels` is empty; only line charts use them.
    fn replace_data(&mut self, data: Vec<ChartPoint>, labels: Vec<String>) {
        match self {
            Chart::Line(chart) => {
                chart.data = data;
                if !labels.is_empty() {
                    chart.labels = labels;
                }
            }
            Chart::Bar(chart) => chart.data = data,
            Chart::Pie(chart) => chart.data = data,
        }
    }

    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        width: f64,
        height: f64,
    ) -> Result<(), SurfaceError> {
        surface.clear()?;
        match self {
            Chart::Line(chart) => render_line(chart, surface, width, height),
            Chart::Bar(chart) => render_bar(chart, surface, width, height),
            Chart::Pie(chart) => render_pie(chart, surface, width, height),
        }
    }
}

fn slot_x(index: usize, count: usize, chart_width: f64) -> f64 {
    if count > 1 {
        PADDING + index as f64 * chart_width / (count - 1) as f64
    } else {
        PADDING
    }
}

fn render_line<S: DrawingSurface + ?Sized>(
    chart: &LineChart,
    surface: &mut S,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    if chart.data.is_empty() {
        return Ok(());
    }
    let chart_width = width - 2.0 * PADDING;
    let chart_height = height - 2.0 * PADDING;

    let values: Vec<f64> = chart.data.iter().map(ChartPoint::value).collect();
    let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max_value == min_value {
        1.0
    } else {
        max_value - min_value
    };

    for step in 0..=GRID_LINES {
        let y = PADDING + chart_height - step as f64 * chart_height / GRID_LINES as f64;
        surface.stroke_polyline(&[(PADDING, y), (PADDING + chart_width, y)], GRID_COLOR, 1)?;
        let tick = min_value + step as f64 * range / GRID_LINES as f64;
        surface.fill_text(
            &format!("{tick:.0}"),
            (PADDING - 10.0, y + 4.0),
            TextAlign::Right,
            AXIS_TEXT_COLOR,
        )?;
    }

    let points: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let x = slot_x(index, values.len(), chart_width);
            let y = PADDING + chart_height - (value - min_value) / range * chart_height;
            (x, y)
        })
        .collect();
    surface.stroke_polyline(&points, SERIES_COLOR, 2)?;
    for point in &points {
        surface.fill_circle(*point, POINT_RADIUS, SERIES_COLOR)?;
    }

    let label_step = chart.labels.len().div_ceil(MAX_X_LABELS).max(1);
    for (index, label) in chart.labels.iter().enumerate() {
        if index % label_step != 0 {
            continue;
        }
        let x = slot_x(index, chart.labels.len(), chart_width);
        surface.fill_text(
            label,
            (x, PADDING + chart_height + 20.0),
            TextAlign::Center,
            AXIS_TEXT_COLOR,
        )?;
    }
    Ok(())
}

fn render_bar<S: DrawingSurface + ?Sized>(
    chart: &BarChart,
    surface: &mut S,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    if chart.data.is_empty() {
        return Ok(());
    }
    let chart_width = width - 2.0 * PADDING;
    let chart_height = height - 2.0 * PADDING;

    let max_value = chart
        .data
        .iter()
        .map(ChartPoint::value)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_value = if max_value == 0.0 || !max_value.is_finite() {
        1.0
    } else {
        max_value
    };

    let slot = chart_width / chart.data.len() as f64;
    let bar_width = slot * BAR_FILL_RATIO;
    let bar_spacing = slot - bar_width;

    for (index, point) in chart.data.iter().enumerate() {
        let value = point.value();
        let x = PADDING + index as f64 * (bar_width + bar_spacing);
        let bar_height = value / max_value * chart_height;
        let y = PADDING + chart_height - bar_height;
        let center = x + bar_width / 2.0;

        surface.fill_rect((x, y), (bar_width, bar_height), point.color().unwrap_or(SERIES_COLOR))?;
        surface.fill_text(point.label(), (center, height - 10.0), TextAlign::Center, AXIS_TEXT_COLOR)?;
        surface.fill_text(&value.to_string(), (center, y - 5.0), TextAlign::Center, VALUE_TEXT_COLOR)?;
    }
    Ok(())
}

fn render_pie<S: DrawingSurface + ?Sized>(
    chart: &PieChart,
    surface: &mut S,
    width: f64,
    height: f64,
) -> Result<(), SurfaceError> {
    let total: f64 = chart.data.iter().map(ChartPoint::value).sum();
    if chart.data.is_empty() || total == 0.0 {
        return Ok(());
    }

    let center = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 3.0;
    let mut start_angle = 0.0;

    for (index, point) in chart.data.iter().enumerate() {
        let value = point.value();
        let slice_angle = value / total * TAU;
        let end_angle = start_angle + slice_angle;
        let color = point.color().unwrap_or(PALETTE[index % PALETTE.len()]);
        surface.fill_sector(center, radius, start_angle, end_angle, color)?;

        let mid_angle = start_angle + slice_angle / 2.0;
        let label_anchor = (
            center.0 + (radius + PIE_LABEL_OFFSET) * mid_angle.cos(),
            center.1 + (radius + PIE_LABEL_OFFSET) * mid_angle.sin(),
        );
        surface.fill_text(
            &format!("{}: {}", point.label(), value),
            label_anchor,
            TextAlign::Center,
            VALUE_TEXT_COLOR,
        )?;
        start_angle = end_angle;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub chart: Chart,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ChartConfig {
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A chart bound to one drawing surface.
///
/// Binding to an id with no surface leaves the chart unbound; rendering an
/// unbound chart does nothing.
pub struct SimpleChart<S> {
    surface: Option<S>,
    chart: Chart,
    width: u32,
    height: u32,
}

impl<S: DrawingSurface> SimpleChart<S> {
    /// Takes the surface registered under `surface_id` and renders once.
    pub fn bind(
        surfaces: &mut SurfaceSet<S>,
        surface_id: &str,
        config: ChartConfig,
    ) -> Result<Self, SurfaceError> {
        let surface = surfaces.take(surface_id);
        if surface.is_none() {
            debug!(surface_id, "no drawing surface registered, chart left unbound");
        }
        let (surface_width, surface_height) = surface
            .as_ref()
            .map(|surface| surface.size())
            .unwrap_or((0, 0));
        let mut chart = Self {
            surface,
            chart: config.chart,
            width: config.width.unwrap_or(non_zero_or(surface_width, DEFAULT_WIDTH)),
            height: config
                .height
                .unwrap_or(non_zero_or(surface_height, DEFAULT_HEIGHT)),
        };
        chart.render()?;
        Ok(chart)
    }

    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        self.chart
            .render(surface, f64::from(self.width), f64::from(self.height))?;
        surface.present()
    }

    /// Replaces the data set and redraws. Empty `labels` keep the old ones.
    pub fn update_data(
        &mut self,
        data: Vec<ChartPoint>,
        labels: Vec<String>,
    ) -> Result<(), SurfaceError> {
        self.chart.replace_data(data, labels);
        self.render()
    }

    /// Replaces kind and data, and the size where given, then redraws.
    pub fn update_options(&mut self, config: ChartConfig) -> Result<(), SurfaceError> {
        self.chart = config.chart;
        if let Some(width) = config.width {
            self.width = width;
        }
        if let Some(height) = config.height {
            self.height = height;
        }
        self.render()
    }
}

#[cfg(test)]
impl<S> SimpleChart<S> {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }
}

fn non_zero_or(value: u32, fallback: u32) -> u32 {
    if value == 0 { fallback } else { value }
}

/// One chart per surface id; asking again for the same id updates the
/// existing chart in place.
pub struct ChartRegistry<S> {
    surfaces: SurfaceSet<S>,
    charts: HashMap<String, SimpleChart<S>>,
}

impl<S: DrawingSurface> ChartRegistry<S> {
    pub fn new(surfaces: SurfaceSet<S>) -> Self {
        Self {
            surfaces,
            charts: HashMap::new(),
        }
    }

    pub fn get_or_create(
        &mut self,
        surface_id: &str,
        config: ChartConfig,
    ) -> Result<Option<&mut SimpleChart<S>>, SurfaceError> {
        match self.charts.entry(surface_id.to_string()) {
            Entry::Occupied(entry) => {
                let chart = entry.into_mut();
                chart.update_options(config)?;
                Ok(Some(chart))
            }
            Entry::Vacant(entry) => {
                let chart = SimpleChart::bind(&mut self.surfaces, surface_id, config)?;
                if !chart.is_bound() {
                    return Ok(None);
                }
                Ok(Some(entry.insert(chart)))
            }
        }
    }
}
