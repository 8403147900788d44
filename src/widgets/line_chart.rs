use iced::{
    Color, Point, Rectangle, Renderer, Size, Theme, mouse,
    widget::canvas::{self, Action, Frame, LineDash, Path, Stroke, Text},
};

use crate::{statistics::LineChartModel, style};

/// Published on hover; the view maps it to its own message type.
#[derive(Debug, Clone, Copy)]
pub enum Interaction {
    Hovered,
}

const PAD_LEFT: f32 = 40.0;
const PAD_RIGHT: f32 = 15.0;
const PAD_TOP: f32 = 15.0;
const PAD_BOTTOM: f32 = 28.0;

/// Daily profile views.
pub struct LineChart<'a> {
    pub model: &'a LineChartModel,
    pub cache: &'a canvas::Cache,
}

/// Round the axis maximum up to a multiple of 4 so the grid gets whole steps.
fn axis_max(max: f64) -> f64 {
    if max <= 0.0 {
        4.0
    } else {
        (max / 4.0).ceil() * 4.0
    }
}

/// Index of the point closest to `x`, given `count` evenly spaced points.
fn nearest_index(x: f32, width: f32, count: usize) -> Option<usize> {
    if count == 0 || width <= 0.0 {
        return None;
    }
    let ratio = ((x - PAD_LEFT) / width).clamp(0.0, 1.0);
    if count == 1 {
        return Some(0);
    }
    Some((ratio * (count - 1) as f32).round() as usize)
}

impl<'a> LineChart<'a> {
    fn point_at(&self, index: usize, bounds: Rectangle) -> Point {
        let w = bounds.width - PAD_LEFT - PAD_RIGHT;
        let h = bounds.height - PAD_TOP - PAD_BOTTOM;
        let count = self.model.values.len();
        let x = if count <= 1 {
            PAD_LEFT + w / 2.0
        } else {
            PAD_LEFT + index as f32 / (count - 1) as f32 * w
        };
        let max = axis_max(self.model.max_value());
        let value = self.model.values.get(index).copied().unwrap_or(0.0);
        Point::new(x, PAD_TOP + h - (value / max) as f32 * h)
    }
}

impl<'a> canvas::Program<Interaction> for LineChart<'a> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Interaction>> {
        if let iced::Event::Mouse(mouse::Event::CursorMoved { .. }) = event {
            if cursor.position_in(bounds).is_some() {
                return Some(Action::publish(Interaction::Hovered));
            }
        }
        None
    }

    fn draw(
        &self,
        _: &Self::State,
        renderer: &Renderer,
        _: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let geo = self.cache.draw(renderer, bounds.size(), |frame| {
            let w = bounds.width - PAD_LEFT - PAD_RIGHT;
            let h = bounds.height - PAD_TOP - PAD_BOTTOM;
            let max = axis_max(self.model.max_value());

            // Y-Axis
            for i in 0..=4 {
                let value = max * i as f64 / 4.0;
                let y = PAD_TOP + h - (i as f32 / 4.0 * h);
                frame.stroke(
                    &Path::line(Point::new(PAD_LEFT, y), Point::new(PAD_LEFT + w, y)),
                    Stroke::default()
                        .with_color(style::STROKE_DIM)
                        .with_width(1.0),
                );
                frame.fill_text(Text {
                    content: format!("{:.0}", value),
                    position: Point::new(PAD_LEFT - 6.0, y),
                    color: style::TEXT_MUTED,
                    size: 10.0.into(),
                    align_x: iced::alignment::Horizontal::Right.into(),
                    align_y: iced::alignment::Vertical::Center,
                    ..Default::default()
                });
            }

            // X-Axis labels, thinned out so they never overlap
            let count = self.model.labels.len();
            let step = (count / 7).max(1);
            for (i, label) in self.model.labels.iter().enumerate().step_by(step) {
                let pt = self.point_at(i, bounds);
                frame.fill_text(Text {
                    content: label.clone(),
                    position: Point::new(pt.x, bounds.height - 8.0),
                    color: style::TEXT_MUTED,
                    size: 10.0.into(),
                    align_x: iced::alignment::Horizontal::Center.into(),
                    align_y: iced::alignment::Vertical::Bottom,
                    ..Default::default()
                });
            }

            let points: Vec<Point> = (0..self.model.values.len())
                .map(|i| self.point_at(i, bounds))
                .collect();

            if let Some(first) = points.first() {
                let mut line = canvas::path::Builder::new();
                line.move_to(*first);
                for pt in &points {
                    line.line_to(*pt);
                }

                let mut fill = canvas::path::Builder::new();
                fill.move_to(Point::new(first.x, PAD_TOP + h));
                for pt in &points {
                    fill.line_to(*pt);
                }
                if let Some(last) = points.last() {
                    fill.line_to(Point::new(last.x, PAD_TOP + h));
                }
                fill.close();

                frame.fill(&fill.build(), Color::from_rgba(0.0, 0.24, 0.53, 0.08));
                frame.stroke(
                    &line.build(),
                    Stroke::default()
                        .with_color(style::BRAND_BLUE)
                        .with_width(2.0),
                );
                for pt in &points {
                    frame.fill(&Path::circle(*pt, 3.0), style::BRAND_BLUE);
                }
            }
        });

        let mut geometries = vec![geo];

        // Hover Overlay
        if let Some(cursor_pos) = cursor.position_in(bounds) {
            let w = bounds.width - PAD_LEFT - PAD_RIGHT;
            let h = bounds.height - PAD_TOP - PAD_BOTTOM;
            if let Some(index) = nearest_index(cursor_pos.x, w, self.model.values.len()) {
                let pt = self.point_at(index, bounds);
                let mut frame = Frame::new(renderer, bounds.size());
                frame.stroke(
                    &Path::line(Point::new(pt.x, PAD_TOP), Point::new(pt.x, PAD_TOP + h)),
                    Stroke {
                        style: style::TEXT_MUTED.into(),
                        width: 1.0,
                        line_dash: LineDash {
                            segments: &[4.0, 4.0],
                            offset: 0,
                        },
                        ..Stroke::default()
                    },
                );
                frame.fill(&Path::circle(pt, 5.0), style::BRAND_RED);

                // Tooltip
                let title = self.model.titles.get(index).cloned().unwrap_or_default();
                let body = self.model.tooltip(index).unwrap_or_default();
                let (box_w, box_h) = (150.0, 40.0);
                let box_x = if pt.x + 10.0 + box_w > bounds.width {
                    pt.x - 10.0 - box_w
                } else {
                    pt.x + 10.0
                };
                let box_y = if pt.y - 20.0 < 0.0 { pt.y + 10.0 } else { pt.y - 20.0 };

                frame.fill(
                    &Path::rounded_rectangle(
                        Point::new(box_x, box_y),
                        Size::new(box_w, box_h),
                        4.0.into(),
                    ),
                    style::TOOLTIP_BG,
                );
                frame.fill_text(Text {
                    content: format!("{}\n{}", title, body),
                    position: Point::new(box_x + box_w / 2.0, box_y + box_h / 2.0),
                    color: style::TEXT_ON_BRAND,
                    size: 12.0.into(),
                    align_x: iced::alignment::Horizontal::Center.into(),
                    align_y: iced::alignment::Vertical::Center,
                    ..Default::default()
                });
                geometries.push(frame.into_geometry());
            }
        }
        geometries
    }
}
