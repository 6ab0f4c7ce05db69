pub(crate) mod filesystem;
pub(crate) mod postgres;
