pub mod delimited;
pub mod plan_read;
pub mod plan_write;
