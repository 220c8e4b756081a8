pub mod all_time;
pub mod dashboard;
pub mod day;
pub mod temporal_bounds;
