pub mod filter;
pub mod histogram;
pub mod range_slider;

pub use filter::DurationFilter;
pub use histogram::DurationChart;
pub use range_slider::RangeSlider;
