use eframe::egui::{pos2, vec2, Rect, Response, Sense, Stroke, Ui, Widget};

use crate::themes::RangeSliderStyle;

/// Which handle the active drag gesture grabbed. Stored in egui temp memory
/// under the widget id, so concurrent sliders each carry their own session
/// and the grabbed handle stays stable while the knobs cross or overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragSession {
    Lower,
    Upper,
}

fn snap_to_step(value: u64, min: u64, step: u64) -> u64 {
    if step == 0 {
        return value;
    }
    let offset = value - min;
    let snapped = (offset + step / 2) / step * step;
    min + snapped
}

fn value_from_fraction(min: u64, max: u64, step: u64, fraction: f32) -> u64 {
    let span = (max - min) as f64;
    let raw = min + (span * fraction.clamp(0.0, 1.0) as f64).round() as u64;
    snap_to_step(raw, min, step).min(max)
}

/// Dual-handle slider selecting an inclusive `[start, end]` sub-range of
/// `[min, max]`, with values snapped to `step`.
#[must_use = "You should put this widget in a ui with `ui.add(widget);`"]
pub struct RangeSlider<'a> {
    start: &'a mut u64,
    end: &'a mut u64,
    min: u64,
    max: u64,
    step: u64,
    desired_width: Option<f32>,
    style: Option<RangeSliderStyle>,
}

impl<'a> RangeSlider<'a> {
    pub fn new(start: &'a mut u64, end: &'a mut u64, min: u64, max: u64) -> Self {
        Self {
            start,
            end,
            min,
            max,
            step: 1,
            desired_width: None,
            style: None,
        }
    }

    /// Snap granularity for dragged values. A zero step leaves values
    /// unsnapped.
    pub fn step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub fn desired_width(mut self, desired_width: f32) -> Self {
        self.desired_width = Some(desired_width);
        self
    }
}

impl Widget for RangeSlider<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let RangeSlider {
            start,
            end,
            min,
            max,
            step,
            desired_width,
            style,
        } = self;

        let gstyle = style.unwrap_or_else(|| RangeSliderStyle::from(ui.style().as_ref()));

        *start = (*start).clamp(min, max);
        *end = (*end).clamp(min, max);
        if *start > *end {
            std::mem::swap(start, end);
        }

        let desired_width = desired_width.unwrap_or_else(|| ui.available_width().max(96.0));
        let height = ui.spacing().interact_size.y;
        let (outer_rect, mut response) =
            ui.allocate_exact_size(vec2(desired_width, height), Sense::hover());
        if !ui.is_rect_visible(outer_rect) {
            return response;
        }

        let knob_r = gstyle.knob_radius;
        let rail = Rect::from_min_max(
            pos2(outer_rect.left() + knob_r, outer_rect.center().y - 2.0),
            pos2(outer_rect.right() - knob_r, outer_rect.center().y + 2.0),
        );

        // A degenerate range has nothing to drag; paint a filled rail only.
        if max <= min || !rail.is_positive() {
            ui.painter().rect_filled(rail, 1.0, gstyle.rail_fill);
            return response;
        }

        let span = (max - min) as f32;
        let knob_x = |value: u64| rail.left() + rail.width() * ((value - min) as f32 / span);
        let lower_rect = Rect::from_center_size(
            pos2(knob_x(*start), rail.center().y),
            vec2(knob_r * 2.0, knob_r * 2.0),
        );
        let upper_rect = Rect::from_center_size(
            pos2(knob_x(*end), rail.center().y),
            vec2(knob_r * 2.0, knob_r * 2.0),
        );

        let lower_resp = ui.interact(
            lower_rect,
            response.id.with("lower_knob"),
            Sense::click_and_drag(),
        );
        let upper_resp = ui.interact(
            upper_rect,
            response.id.with("upper_knob"),
            Sense::click_and_drag(),
        );

        let session_id = response.id.with("drag_session");
        let mut session: Option<DragSession> =
            ui.ctx().data_mut(|data| data.get_temp(session_id));

        // The upper knob wins a grab on overlap; it is the one drawn on top.
        if upper_resp.drag_started() {
            session = Some(DragSession::Upper);
        } else if lower_resp.drag_started() {
            session = Some(DragSession::Lower);
        }

        if let Some(active) = session {
            let pointer = ui
                .input(|input| input.pointer.interact_pos())
                .or_else(|| ui.input(|input| input.pointer.latest_pos()));
            if let Some(pointer) = pointer {
                let fraction = (pointer.x - rail.left()) / rail.width();
                let value = value_from_fraction(min, max, step, fraction);
                match active {
                    DragSession::Lower => {
                        let new_start = value.min(*end);
                        if new_start != *start {
                            *start = new_start;
                            response.mark_changed();
                        }
                    }
                    DragSession::Upper => {
                        let new_end = value.max(*start);
                        if new_end != *end {
                            *end = new_end;
                            response.mark_changed();
                        }
                    }
                }
            }

            let released = match active {
                DragSession::Lower => lower_resp.drag_stopped(),
                DragSession::Upper => upper_resp.drag_stopped(),
            };
            if released {
                ui.ctx()
                    .data_mut(|data| data.remove::<DragSession>(session_id));
            } else {
                ui.ctx().data_mut(|data| data.insert_temp(session_id, active));
            }
        }

        let painter = ui.painter();
        painter.rect_filled(rail, 1.0, gstyle.rail_bg);
        let fill_rect = Rect::from_min_max(
            pos2(knob_x(*start), rail.top()),
            pos2(knob_x(*end), rail.bottom()),
        );
        if fill_rect.is_positive() {
            painter.rect_filled(fill_rect, 1.0, gstyle.rail_fill);
        }

        for (rect, resp, grabbed) in [
            (lower_rect, &lower_resp, session == Some(DragSession::Lower)),
            (upper_rect, &upper_resp, session == Some(DragSession::Upper)),
        ] {
            let outline = if grabbed || resp.hovered() {
                gstyle.accent
            } else {
                gstyle.rail_fill
            };
            painter.circle(
                rect.center(),
                knob_r,
                gstyle.knob,
                Stroke::new(1.5, outline),
            );
        }

        // Fold the knob gestures in so callers see drags and changes on the
        // one response they get back.
        response.union(lower_resp).union(upper_resp)
    }
}

impl crate::themes::Styled for RangeSlider<'_> {
    type Style = RangeSliderStyle;

    fn set_style(&mut self, style: Option<Self::Style>) {
        self.style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_map_onto_the_bounds() {
        assert_eq!(value_from_fraction(100, 900, 1, 0.0), 100);
        assert_eq!(value_from_fraction(100, 900, 1, 1.0), 900);
        assert_eq!(value_from_fraction(100, 900, 1, 0.5), 500);
        // Out-of-rail pointer positions clamp.
        assert_eq!(value_from_fraction(100, 900, 1, -0.3), 100);
        assert_eq!(value_from_fraction(100, 900, 1, 1.7), 900);
    }

    #[test]
    fn values_snap_to_the_step() {
        assert_eq!(value_from_fraction(100, 900, 20, 0.26), 300);
        assert_eq!(snap_to_step(109, 100, 20), 100);
        assert_eq!(snap_to_step(110, 100, 20), 120);
        assert_eq!(snap_to_step(119, 100, 20), 120);
    }

    #[test]
    fn zero_step_leaves_values_unsnapped() {
        assert_eq!(snap_to_step(137, 100, 0), 137);
    }
}
