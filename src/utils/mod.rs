pub mod html;
pub mod ip;
pub mod url_validator;

pub use html::escape_html;
pub use url_validator::validate_url;
