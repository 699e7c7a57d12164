//! Platform-specific image builders.
//!
//! Only macOS disk images are produced. The module compiles on every host so
//! layouts can be validated and tested anywhere; building a real image needs
//! `hdiutil` at runtime.

pub mod macos;
