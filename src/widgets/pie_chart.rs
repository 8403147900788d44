use std::f32::consts::{FRAC_PI_2, TAU};

use iced::{
    Point, Rectangle, Renderer, Size, Theme, Vector, mouse,
    widget::canvas::{self, Action, Frame, Path, Stroke, Text},
};

use crate::{statistics::PieChartModel, style};

#[derive(Debug, Clone, Copy)]
pub enum Interaction {
    Hovered,
}

/// Contacts received per period, drawn as a doughnut.
pub struct PieChart<'a> {
    pub model: &'a PieChartModel,
    pub center_label: String,
    pub cache: &'a canvas::Cache,
}

/// Start and sweep angle of each slice, clockwise from 12 o'clock.
/// An all-zero model yields no arcs.
pub fn slice_angles(values: &[u64]) -> Vec<(f32, f32)> {
    let total: u64 = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|v| {
            let sweep = *v as f32 / total as f32 * TAU;
            let arc = (start, sweep);
            start += sweep;
            arc
        })
        .collect()
}

/// Slice under `angle` (radians, same origin as [`slice_angles`]).
fn slice_at(angles: &[(f32, f32)], angle: f32) -> Option<usize> {
    let mut a = angle;
    while a < -FRAC_PI_2 {
        a += TAU;
    }
    while a >= -FRAC_PI_2 + TAU {
        a -= TAU;
    }
    angles
        .iter()
        .position(|(start, sweep)| *sweep > 0.0 && a >= *start && a < start + sweep)
}

impl<'a> PieChart<'a> {
    fn geometry(bounds: Rectangle) -> (Point, f32, f32) {
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 12.0;
        let width = (radius * 0.35).max(8.0);
        (center, radius - width / 2.0, width)
    }
}

impl<'a> canvas::Program<Interaction> for PieChart<'a> {
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
        let values: Vec<u64> = self.model.slices.iter().map(|s| s.value).collect();
        let angles = slice_angles(&values);

        let geo = self.cache.draw(renderer, bounds.size(), |frame| {
            let (center, radius, width) = Self::geometry(bounds);

            // Background ring
            let ring = Path::new(|b| {
                b.arc(canvas::path::Arc {
                    center,
                    radius,
                    start_angle: 0.0.into(),
                    end_angle: TAU.into(),
                })
            });
            frame.stroke(
                &ring,
                Stroke::default()
                    .with_color(style::STROKE_DIM)
                    .with_width(width),
            );

            for (i, (start, sweep)) in angles.iter().enumerate() {
                if *sweep <= 0.0 {
                    continue;
                }
                let arc = Path::new(|b| {
                    b.arc(canvas::path::Arc {
                        center,
                        radius,
                        start_angle: (*start).into(),
                        end_angle: (start + sweep).into(),
                    })
                });
                frame.stroke(
                    &arc,
                    Stroke::default()
                        .with_color(style::PIE_COLORS[i % style::PIE_COLORS.len()])
                        .with_width(width),
                );
            }

            frame.fill_text(Text {
                content: self.model.total().to_string(),
                position: center + Vector::new(0.0, -8.0),
                color: style::TEXT_DARK,
                size: 28.0.into(),
                align_x: iced::alignment::Horizontal::Center.into(),
                align_y: iced::alignment::Vertical::Center,
                ..Default::default()
            });
            frame.fill_text(Text {
                content: self.center_label.clone(),
                position: center + Vector::new(0.0, 16.0),
                color: style::TEXT_MUTED,
                size: 12.0.into(),
                align_x: iced::alignment::Horizontal::Center.into(),
                align_y: iced::alignment::Vertical::Center,
                ..Default::default()
            });
        });

        let mut geometries = vec![geo];

        // Hover tooltip
        if let Some(pos) = cursor.position_in(bounds) {
            let (center, radius, width) = Self::geometry(bounds);
            let offset = pos - center;
            let distance = (offset.x * offset.x + offset.y * offset.y).sqrt();
            if (distance - radius).abs() <= width / 2.0 {
                let angle = offset.y.atan2(offset.x);
                if let Some(index) = slice_at(&angles, angle) {
                    if let Some(tooltip) = self.model.tooltip(index) {
                        let label = self.model.slices[index].label;
                        let mut frame = Frame::new(renderer, bounds.size());
                        let (box_w, box_h) = (170.0, 40.0);
                        let box_x = (pos.x + 10.0).min(bounds.width - box_w);
                        let box_y = (pos.y - box_h - 5.0).max(0.0);
                        frame.fill(
                            &Path::rounded_rectangle(
                                Point::new(box_x, box_y),
                                Size::new(box_w, box_h),
                                4.0.into(),
                            ),
                            style::TOOLTIP_BG,
                        );
                        frame.fill_text(Text {
                            content: format!("{}\n{}", label, tooltip),
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
            }
        }
        geometries
    }
}
