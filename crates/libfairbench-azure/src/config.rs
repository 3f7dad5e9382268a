//! Workspace credentials and compute settings

use std::fmt;

use crate::error::{AzureError, Result};

pub const TENANT_ID: &str = "TENANT_ID";
pub const SERVICE_PRINCIPAL_ID: &str = "SERVICE_PRINCIPAL_ID";
pub const SERVICE_PRINCIPAL_PASSWORD: &str = "SERVICE_PRINCIPAL_PASSWORD";
pub const SUBSCRIPTION_ID: &str = "SUBSCRIPTION_ID";
pub const RESOURCE_GROUP_NAME: &str = "RESOURCE_GROUP_NAME";
pub const WORKSPACE_NAME: &str = "WORKSPACE_NAME";
pub const WORKSPACE_LOCATION: &str = "WORKSPACE_LOCATION";

/// Everything needed to authenticate and locate the workspace.
///
/// Built once at startup and passed to [`crate::Workspace::acquire`].
#[derive(Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub tenant_id: String,
    pub service_principal_id: String,
    pub service_principal_password: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
    pub location: String,
}

impl WorkspaceConfig {
    /// Read all settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read all settings through `lookup`; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(AzureError::MissingEnv(key))
        };

        Ok(Self {
            tenant_id: get(TENANT_ID)?,
            service_principal_id: get(SERVICE_PRINCIPAL_ID)?,
            service_principal_password: get(SERVICE_PRINCIPAL_PASSWORD)?,
            subscription_id: get(SUBSCRIPTION_ID)?,
            resource_group: get(RESOURCE_GROUP_NAME)?,
            workspace_name: get(WORKSPACE_NAME)?,
            location: get(WORKSPACE_LOCATION)?,
        })
    }
}

impl fmt::Debug for WorkspaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceConfig")
            .field("tenant_id", &self.tenant_id)
            .field("service_principal_id", &self.service_principal_id)
            .field("service_principal_password", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("workspace_name", &self.workspace_name)
            .field("location", &self.location)
            .finish()
    }
}

/// Compute cluster provisioned when the workspace has none by that name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    pub name: String,
    pub vm_size: String,
    pub vm_priority: String,
    pub min_nodes: u32,
    pub max_nodes: u32,
    pub idle_seconds_before_scaledown: u32,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            name: "cpu-cluster".to_string(),
            vm_size: "STANDARD_DS2_V2".to_string(),
            vm_priority: "dedicated".to_string(),
            min_nodes: 0,
            max_nodes: 10,
            idle_seconds_before_scaledown: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        [
            (TENANT_ID, "tenant"),
            (SERVICE_PRINCIPAL_ID, "sp-id"),
            (SERVICE_PRINCIPAL_PASSWORD, "hunter2"),
            (SUBSCRIPTION_ID, "sub"),
            (RESOURCE_GROUP_NAME, "perf-rg"),
            (WORKSPACE_NAME, "perf-ws"),
            (WORKSPACE_LOCATION, "westus2"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }

    #[test]
    fn test_from_lookup() {
        let env = full_env();
        let config = WorkspaceConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.resource_group, "perf-rg");
        assert_eq!(config.location, "westus2");
    }

    #[test]
    fn test_missing_variable_is_named() {
        let mut env = full_env();
        env.remove(SUBSCRIPTION_ID);
        let err = WorkspaceConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AzureError::MissingEnv(SUBSCRIPTION_ID)));
        assert!(err.to_string().contains("SUBSCRIPTION_ID"));
    }

    #[test]
    fn test_empty_variable_counts_as_missing() {
        let mut env = full_env();
        env.insert(WORKSPACE_NAME, "  ".to_string());
        assert!(WorkspaceConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let env = full_env();
        let config = WorkspaceConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
