pub mod calculator;
pub mod matcher;
pub mod plan;
