//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod catalog_seeder;
mod role_service;
mod security_ports;
mod taxonomy_ports;
mod taxonomy_service;
mod token_crypto;
mod user_service;

#[cfg(test)]
mod test_support;

pub use authorization_service::{AuthorizationService, AuthorizedIdentity, Credential};
pub use catalog_seeder::{
    CatalogLeavePolicy, CatalogLeaveSubtype, CatalogLeaveType, CatalogSeeder, SeedCounts,
    SeedReport, TaxonomyCatalog,
};
pub use role_service::{RoleService, UserRoles};
pub use security_ports::{
    AccessTokenRepository, PasswordHasher, RoleRecord, RoleRepository, UserRecord,
    UserRepository,
};
pub use taxonomy_ports::{
    CodeScope, LeavePolicyFilter, LeavePolicyInput, LeaveSubtypeInput, LeaveTypeInput,
    TaxonomyRepository, TaxonomyTransaction,
};
pub use taxonomy_service::TaxonomyService;
pub use user_service::{CreateUserInput, IssuedAccessToken, UpdateUserInput, UserService};
