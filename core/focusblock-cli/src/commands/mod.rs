pub mod collect;
pub mod start;
pub mod status;
