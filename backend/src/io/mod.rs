//! # IO Module
//!
//! Interface layer between HTTP clients (the landing page and calculator
//! widgets) and the domain services. Translates requests into service calls,
//! domain errors into status codes and results into JSON.
//!
//! Handlers contain no business logic; everything they need is reached
//! through [`crate::AppState`].

pub mod rest;
