pub mod band;
pub mod date_range;
pub mod debounce;
