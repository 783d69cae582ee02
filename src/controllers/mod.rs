//! Controllers of the bundled demo application.
//!
//! Each controller only picks a template and fills a few variables; the
//! page is assembled by the dispatcher from the `dispatch` configuration.
//! [`crate::registry::register_all`] registers them under their identities.

pub mod dispatch_main;
pub mod dispatch_sidebar;
pub mod layout_alternative_header;
pub mod layout_basket;
pub mod layout_footer;
pub mod layout_header;
pub mod page_index;
