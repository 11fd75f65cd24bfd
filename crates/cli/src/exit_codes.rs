//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | document         | Grid document read/write codes           |
//! | 10-19   | script           | Interaction script codes                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Document (3-9)
// =============================================================================

/// Document could not be read or parsed.
pub const EXIT_DOCUMENT_READ: u8 = 3;

/// Output document could not be written.
pub const EXIT_DOCUMENT_WRITE: u8 = 4;

// =============================================================================
// Script (10-19)
// =============================================================================

/// Script file could not be read.
pub const EXIT_SCRIPT_READ: u8 = 10;

/// Script contains an unknown command or a malformed argument.
pub const EXIT_SCRIPT_PARSE: u8 = 11;

// =============================================================================
// Error mapping
// =============================================================================

use gridkit_io::DocumentError;

/// Map a DocumentError to its exit code.
pub fn document_exit_code(err: &DocumentError) -> u8 {
    match err {
        DocumentError::Write { .. } => EXIT_DOCUMENT_WRITE,
        DocumentError::UnsupportedFormat(_) => EXIT_USAGE,
        DocumentError::Read { .. } | DocumentError::Json(_) | DocumentError::Toml(_) => EXIT_DOCUMENT_READ,
    }
}
