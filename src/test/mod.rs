//! Helpers shared by the in-crate test modules.

pub(crate) mod quick;
