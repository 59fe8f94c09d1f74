//! In-memory dashboard state: the product list, its load state and the
//! status panel, kept in step with the record service.

mod client;
mod messages;
mod service;

pub use client::DashboardClient;
pub use messages::*;
pub use service::DashboardService;
