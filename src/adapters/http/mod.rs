//! HTTP boundary for the scheduling services.

pub mod classes_http;
pub mod dto;

pub use classes_http::{ClassesHttpServer, CLUB_HEADER};
