//! CLI command implementations

pub mod check;
pub mod href;
pub mod interactive;
pub mod resolve;
pub mod routes;

pub use check::check_command;
pub use href::href_command;
pub use interactive::interactive_command;
pub use resolve::resolve_command;
pub use routes::routes_command;
