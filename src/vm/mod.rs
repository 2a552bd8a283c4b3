pub mod bridge;
pub mod input;
