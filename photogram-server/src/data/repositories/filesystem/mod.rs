pub(crate) mod photo_storage;
