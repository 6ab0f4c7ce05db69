pub(crate) mod auth_service;
pub(crate) mod post_command_service;
pub(crate) mod post_query_service;

#[cfg(test)]
pub(crate) mod fakes;
