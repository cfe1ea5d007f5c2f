pub(crate) mod cover;
pub(crate) mod gesture;
pub(crate) mod preview;
