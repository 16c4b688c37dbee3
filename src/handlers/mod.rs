pub mod dashboard_handlers;

pub use dashboard_handlers::dashboard_handler;
