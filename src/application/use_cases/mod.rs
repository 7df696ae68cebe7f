/// Use cases module containing application business logic orchestration
mod audit_index;
mod generate_index_page;

pub use audit_index::AuditIndexUseCase;
pub use generate_index_page::GenerateIndexPageUseCase;
