pub mod fields;
pub mod payload;

pub use fields::{expect_object, FieldReader, WriteMode};
pub use payload::Writable;
