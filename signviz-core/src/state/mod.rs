pub(crate) mod lighting;
pub(crate) mod sign;
pub(crate) mod zoom;
