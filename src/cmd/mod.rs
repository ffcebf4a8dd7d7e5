pub mod create;
pub mod shared;
pub mod update;
