//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_taxonomy_repository;
mod postgres_access_token_repository;
mod postgres_errors;
mod postgres_role_repository;
mod postgres_taxonomy_repository;
mod postgres_user_repository;

#[cfg(test)]
mod postgres_test_support;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_taxonomy_repository::InMemoryTaxonomyRepository;
pub use postgres_access_token_repository::PostgresAccessTokenRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_taxonomy_repository::PostgresTaxonomyRepository;
pub use postgres_user_repository::PostgresUserRepository;
