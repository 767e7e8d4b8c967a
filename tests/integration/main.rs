//! Integration tests driving the HTTP router in-process.

mod api_test;
mod helpers;
mod library_test;
mod render_test;
