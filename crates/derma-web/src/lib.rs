//! # Derma Web
//!
//! 面向临床看板前端的REST接口层。

pub mod handlers;
pub mod server;

pub use handlers::{create_routes, AppState};
pub use server::ApiServer;
