//! Guarantor record management for the loan-origination intake workflow.
//!
//! The crate is split between [`guarantors`] (domain model, validation, the
//! data-access service and its REST surface, page view builders) and [`form`]
//! (the multi-step intake form controller with draft persistence). The
//! `guarantor-intake-api` service binary wires both to an in-memory store.

pub mod config;
pub mod error;
pub mod form;
pub mod guarantors;
pub mod telemetry;
