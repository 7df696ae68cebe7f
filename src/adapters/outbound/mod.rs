/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod console;
pub mod container;
pub mod filesystem;
pub mod formatters;
pub mod operator_sdk;
pub mod process;
