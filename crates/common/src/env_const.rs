// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

pub const CMS_LOG: &str = "CMS_LOG";
pub const CMS_DEPLOYMENT_MODE: &str = "CMS_DEPLOYMENT_MODE"; // "dev" or "prod" (default)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Dev,
    Prod,
}

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Invalid value '{env_value}' for '{env_key}': {message}")]
    InvalidEnum {
        env_key: &'static str,
        env_value: String,
        message: String,
    },
}

/// The deployment mode named by `value`, the value of [`CMS_DEPLOYMENT_MODE`] if set
pub fn parse_deployment_mode(value: Option<&str>) -> Result<DeploymentMode, EnvError> {
    match value {
        Some("dev") => Ok(DeploymentMode::Dev),
        Some("prod") | None => Ok(DeploymentMode::Prod),
        Some(other) => Err(EnvError::InvalidEnum {
            env_key: CMS_DEPLOYMENT_MODE,
            env_value: other.to_string(),
            message: "Must be one of 'dev' or 'prod'".to_string(),
        }),
    }
}

pub fn get_deployment_mode() -> Result<DeploymentMode, EnvError> {
    parse_deployment_mode(std::env::var(CMS_DEPLOYMENT_MODE).ok().as_deref())
}

/// Anything but an explicit development mode counts as production
pub fn is_production() -> bool {
    matches!(get_deployment_mode(), Ok(DeploymentMode::Prod) | Err(_))
}
