//! # Data Models
//!
//! SeaORM entities for the staging store: raw staged records written by
//! collectors, per-scope configuration, discovered field metadata and the
//! derived issue records.

pub mod issue;
pub mod issue_field;
pub mod scope_config;
pub mod staged_deployment;
pub mod staged_issue;

pub use issue::Entity as Issue;
pub use issue_field::Entity as IssueField;
pub use scope_config::Entity as ScopeConfig;
pub use staged_deployment::Entity as StagedDeployment;
pub use staged_issue::Entity as StagedIssue;
