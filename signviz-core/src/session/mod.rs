pub(crate) mod capture;
pub(crate) mod live;
pub(crate) mod scene;
