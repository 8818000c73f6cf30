//! UI panels: calibration controls, intensity image, phasor plot.

pub mod control_panel;
pub mod image_view;
pub mod plot_view;
pub mod theme;
