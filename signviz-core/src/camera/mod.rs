pub(crate) mod still;
pub(crate) mod stream;
