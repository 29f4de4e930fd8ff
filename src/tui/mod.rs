pub mod chart;
pub mod input;
pub mod mode;
pub mod piano_roll;
pub mod view;
