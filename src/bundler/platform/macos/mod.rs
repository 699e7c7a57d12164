//! macOS packaging support for DMG disk images.
//!
//! # Build Requirements
//!
//! | Format | Required Tools | Notes |
//! |--------|----------------|-------|
//! | .dmg | `hdiutil` | Built into macOS |
//! | Window layout | `osascript`, Finder | Skipped with a warning when unavailable |

pub mod dmg;
