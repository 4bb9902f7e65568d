pub mod mean;

pub use mean::{mean_stack, mean_stack_u8};
