//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations on the staging store with
//! scope-aware methods.

pub mod deployment;
pub mod issue;
pub mod issue_field;
pub mod scope_config;

pub use deployment::DeploymentRepository;
pub use issue::IssueRepository;
pub use issue_field::IssueFieldRepository;
pub use scope_config::ScopeConfigRepository;
