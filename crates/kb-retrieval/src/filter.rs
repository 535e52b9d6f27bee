//! Translates tenant, project and optional article constraints into a
//! vector-index filter.

use kb_core::{Error, FieldCondition, Result, SearchFilter, SearchOptions};

/// Payload key holding the tenant identity.
pub const TENANT_KEY: &str = "tenant_id";
/// Payload key holding the project identity.
pub const PROJECT_KEY: &str = "project_id";
/// Payload key holding the public visibility flag.
pub const PUBLIC_KEY: &str = "is_public";
/// Payload key holding the article status.
pub const STATUS_KEY: &str = "status";
/// Payload key holding the article tags.
pub const TAGS_KEY: &str = "tags";

/// Builds conjunctive search filters.
pub struct FilterBuilder;

impl FilterBuilder {
    /// Build the filter for a tenant and project, plus optional constraints.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the tenant or project identity is empty
    pub fn build(
        tenant_id: &str,
        project_id: &str,
        options: Option<&SearchOptions>,
    ) -> Result<SearchFilter> {
        if tenant_id.trim().is_empty() {
            return Err(Error::InvalidInput("tenant id must not be empty".to_owned()));
        }
        if project_id.trim().is_empty() {
            return Err(Error::InvalidInput("project id must not be empty".to_owned()));
        }

        let mut filter = SearchFilter::default()
            .with(FieldCondition::equals(TENANT_KEY, tenant_id))
            .with(FieldCondition::equals(PROJECT_KEY, project_id));

        if let Some(options) = options {
            if options.public_only {
                filter = filter.with(FieldCondition::equals(PUBLIC_KEY, true));
            }
            if !options.status.is_empty() {
                filter = filter.with(FieldCondition::any(STATUS_KEY, options.status.clone()));
            }
            if !options.tags.is_empty() {
                filter = filter.with(FieldCondition::any(TAGS_KEY, options.tags.clone()));
            }
        }

        Ok(filter)
    }
}
