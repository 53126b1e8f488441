pub mod auth;
pub mod backend;
pub mod configuration;
pub mod legacy;
pub mod model;
pub mod observability;
pub mod routes;
pub mod services;
pub mod startup;
pub mod templates;
