pub mod pixelate_job;
pub mod region_pixelator;
pub mod region_schedule;
