//! Request and Response models for the cache HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeyParams, QueryParams, WriteRequest};
pub use responses::{
    CheckResponse, ErrorResponse, HealthResponse, QueryResponse, StatsResponse, SweepResponse,
    WriteResponse,
};
