pub mod deprecated_apis;

pub use deprecated_apis::DeprecatedApiPolicy;
