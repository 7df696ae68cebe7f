/// Application layer - Use cases, DTOs and read models
///
/// This layer contains the application logic that orchestrates
/// audit domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod factories;
pub mod read_models;
pub mod services;
pub mod use_cases;
