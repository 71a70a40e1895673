//! Outbound HTTP clients for sibling services.

pub mod upstream;

pub use upstream::{
    EMPLOYMENT_SERVICE, UNIVERSITY_SERVICE, UpstreamClient, UpstreamError, endpoint,
};
