pub mod line_chart;
pub mod pie_chart;
