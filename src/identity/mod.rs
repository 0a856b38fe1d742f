pub mod resolver;

pub use resolver::{resolve, NameBook};
