//! Exit statuses understood by the pipelines that invoke this tool.

pub const SUCCESS: u8 = 0;
pub const GENERAL_FAILURE: u8 = 1;
pub const INVALID_CREDENTIALS: u8 = 200;
pub const BAD_REQUEST: u8 = 201;
pub const RESOURCE_NOT_FOUND: u8 = 202;
pub const UNPROCESSABLE_ENTITY: u8 = 203;
pub const UNKNOWN_ERROR: u8 = 249;
