//! Exit codes for the descry binary.
//!
//! CI gates on these: anything non-zero blocks the merge. All failure
//! classes collapse to 1 so pipelines only need one check.

pub const SUCCESS: i32 = 0;
pub const VALIDATION_FAILED: i32 = 1; // At least one descriptor had issues
pub const FATAL_ERROR: i32 = 1; // Configuration or authentication failure
