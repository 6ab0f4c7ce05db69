pub(crate) mod account;
pub(crate) mod health;
pub(crate) mod posts;
