/// Factory: build the request-path services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::introspection::{ClientCredentials, IntrospectionClient, IntrospectionError};
use crate::services::policy::Policy;

pub fn build_introspection_client(
    config: &Config,
) -> Result<Arc<IntrospectionClient>, IntrospectionError> {
    let credentials = ClientCredentials::new(&config.client_id, &config.client_secret);
    let client = IntrospectionClient::new(
        &config.zitadel_host,
        &credentials,
        config.introspection_timeout,
    )?;

    Ok(Arc::new(client))
}

pub fn build_policy(config: &Config) -> Arc<Policy> {
    Arc::new(Policy::new(&config.project_id, config.verify_tenant))
}
