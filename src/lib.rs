//! Stance Flow - Layered questionnaire flow controller
//!
//! This crate drives a multi-phase questionnaire: a landing phase, three
//! layered checkpoints (initial position, challenge, mind changer) each with a
//! selection and a review step, optional check-in interludes, and a summary.
//! Progress can be resumed after interruption.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
