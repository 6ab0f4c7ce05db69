pub(crate) mod auth_panel;
pub(crate) mod feed_panel;
pub(crate) mod post_detail;
