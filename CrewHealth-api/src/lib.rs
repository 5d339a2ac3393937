// crew_health_api lib.rs
//
// HTTP surface of the CrewHealth service: routes, request and response
// entities, configuration and the OpenAPI document.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
