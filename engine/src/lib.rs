//! Engine-level services shared by the tour core and its runtimes.

pub mod logging;
