pub mod input;

pub use input::{InputResult, TextInput};
