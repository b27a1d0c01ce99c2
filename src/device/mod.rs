//! Device payload layouts
//!
//! One module per controller. Each exposes a `decode` function turning an
//! assembled payload into a typed reading.

pub mod deltasol_cs4;

pub use deltasol_cs4::Reading;
