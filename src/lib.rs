#![forbid(unsafe_code)]

pub mod config;
pub mod datamodel;
pub mod datasource;
pub mod error;
pub mod http;
pub mod provider;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
