//! Synthetic customer-experience dataset generator.
//!
//! Five relationally linked tables (users, subscriptions, events,
//! survey responses, experiment assignments) with catalogued data
//! quality defects injected at fixed rates. Deterministic per seed.

pub mod comment_generator;
pub mod config;
pub mod dataset;
pub mod defect_injector;
pub mod engine;
pub mod error;
pub mod event_generator;
pub mod experiment_generator;
pub mod generator;
pub mod identity;
pub mod output;
pub mod quality;
pub mod rng;
pub mod store;
pub mod subscription_generator;
pub mod survey_generator;
pub mod types;
pub mod user_generator;
