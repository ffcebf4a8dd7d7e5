pub mod attachment;
pub mod convert;
pub mod story;
