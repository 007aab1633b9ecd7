pub mod generate;

pub use generate::{alternating, breathing, repeating_pattern, sine_4s};
