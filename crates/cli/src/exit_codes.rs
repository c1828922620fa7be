//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part
//! of the shell contract — scripts rely on them.
//!
//! | Code | Description                                   |
//! |------|-----------------------------------------------|
//! | 0    | Success                                       |
//! | 1    | General error; for `search`, "no matches"     |
//! | 2    | Usage error (bad args, missing options)       |
//! | 3    | I/O error (unreadable input, failed write)    |
//! | 4    | Parse error (malformed delimited input)       |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error. For `search` this means "no matches found",
/// mirroring `grep(1)`.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Parse error - input is not well-formed delimited text.
pub const EXIT_PARSE: u8 = 4;
