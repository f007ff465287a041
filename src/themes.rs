use egui::{Color32, Style};

/// Semantic style for the [`DurationChart`](crate::widgets::DurationChart)
/// widget.
#[derive(Clone, Debug)]
pub struct HistogramStyle {
    pub outline: Color32,
    pub ink: Color32,
    pub grid: Color32,
    pub accent: Color32,
    /// Ink used for bars outside the active selection.
    pub dimmed: Color32,
}

/// Semantic style for the [`RangeSlider`](crate::widgets::RangeSlider)
/// widget.
#[derive(Clone, Debug)]
pub struct RangeSliderStyle {
    pub rail_bg: Color32,
    pub rail_fill: Color32,
    pub knob: Color32,
    pub accent: Color32,
    pub knob_radius: f32,
}

impl From<&Style> for HistogramStyle {
    fn from(style: &Style) -> Self {
        let visuals = &style.visuals;
        let outline = visuals.widgets.noninteractive.bg_stroke.color;
        let ink = visuals.widgets.noninteractive.fg_stroke.color;
        Self {
            outline,
            ink,
            grid: blend(outline, visuals.window_fill, 0.55),
            accent: visuals.selection.stroke.color,
            dimmed: blend(ink, visuals.window_fill, 0.65),
        }
    }
}

impl From<&Style> for RangeSliderStyle {
    fn from(style: &Style) -> Self {
        let visuals = &style.visuals;
        Self {
            rail_bg: visuals.extreme_bg_color,
            rail_fill: visuals.selection.bg_fill,
            knob: visuals.widgets.inactive.fg_stroke.color,
            accent: visuals.selection.stroke.color,
            knob_radius: 6.0,
        }
    }
}

/// Per-widget style override hook.
pub trait Styled {
    type Style: Clone;

    fn set_style(&mut self, style: Option<Self::Style>);

    fn styled(mut self, style: Self::Style) -> Self
    where
        Self: Sized,
    {
        self.set_style(Some(style));
        self
    }
}

// Color utilities: simple sRGB linear interpolation for quick palette derivation
pub fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let r = (a.r() as f32 * (1.0 - t) + b.r() as f32 * t).round() as u8;
    let g = (a.g() as f32 * (1.0 - t) + b.g() as f32 * t).round() as u8;
    let bch = (a.b() as f32 * (1.0 - t) + b.b() as f32 * t).round() as u8;
    Color32::from_rgb(r, g, bch)
}
