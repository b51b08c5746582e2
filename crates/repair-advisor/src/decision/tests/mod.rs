mod common;
mod tuning;
