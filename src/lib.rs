//! Resilient Inventory Gateway
//!
//! Fronts a remote inventory service with an explicit resilience policy
//! layer, composed differently per call path.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────┐
//!                  │                INVENTORY GATEWAY                   │
//!                  │                                                    │
//!  GET .../sync    │  ┌──────┐   ┌───────┐   ┌─────────┐   ┌────────┐  │
//!  ────────────────┼─▶│ http │──▶│ retry │──▶│ breaker │──▶│ remote │──┼──▶ Inventory
//!                  │  └──────┘   └───────┘   └─────────┘   └────────┘  │    Service
//!                  │                                                    │
//!  GET .../async   │  ┌──────┐   ┌─────────────┐   ┌─────────────────┐ │
//!  ────────────────┼─▶│ http │──▶│ time limiter│──▶│ worker pool     │ │
//!                  │  └──────┘   └─────────────┘   │ breaker → remote│─┼──▶ Inventory
//!                  │                               └─────────────────┘ │    Service
//!                  │                                                    │
//!                  │  Terminal failures → fallback chain → response     │
//!                  │                                                    │
//!                  │  ┌────────────────────────────────────────────┐   │
//!                  │  │           Cross-Cutting Concerns           │   │
//!                  │  │  config │ lifecycle │ observability        │   │
//!                  │  └────────────────────────────────────────────┘   │
//!                  └───────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline boundary never raises: every call returns a usable body,
//! real or fallback.

// Core subsystems
pub mod config;
pub mod failure;
pub mod http;
pub mod pipeline;
pub mod remote;
pub mod resilience;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
