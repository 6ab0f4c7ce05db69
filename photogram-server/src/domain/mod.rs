pub(crate) mod error;
pub(crate) mod photo;
pub(crate) mod post;
pub(crate) mod search;
pub(crate) mod user;
