//! Go toolchain integration

pub mod list;

pub use list::GoListProvider;
