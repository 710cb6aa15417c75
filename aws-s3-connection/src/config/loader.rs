/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::config::Credentials;
use aws_types::region::Region;

use crate::config::Builder;
use crate::Config;

/// Environment variable holding the access key ID, as read by earlier releases of this library
const LEGACY_ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY";
/// Environment variable holding the secret access key
const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable read by the default credentials chain
const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";

const CREDENTIALS_PROVIDER_NAME: &str = "aws-s3-connection";

/// Load connection [`Config`] from the environment.
///
/// This is the connection factory: settings not given explicitly are resolved through the
/// default `aws-config` provider chain (environment variables, shared profile, IMDS).
///
/// Credentials are chosen in this order:
///
/// 1. a pair set with [`credentials`](ConfigLoader::credentials)
/// 2. the default chain, whenever `AWS_ACCESS_KEY_ID` is set (this honours `AWS_SESSION_TOKEN`)
/// 3. `AWS_ACCESS_KEY` and `AWS_SECRET_ACCESS_KEY`, when both are set
/// 4. the rest of the default chain
#[derive(Default, Debug)]
pub struct ConfigLoader {
    credentials: Option<Credentials>,
    region: Option<Region>,
    endpoint_url: Option<String>,
    force_path_style: Option<bool>,
}

impl ConfigLoader {
    /// Authenticate with a static access key ID and secret access key pair.
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
        self
    }

    /// Set the region requests are sent to.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(Region::new(region.into()));
        self
    }

    /// Send requests to a custom endpoint, e.g. an S3 compatible service.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Address buckets as `https://endpoint/bucket` rather than `https://bucket.endpoint`.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Config {
        let mut loader = aws_config::from_env();
        if let Some(credentials) = self.credentials.or_else(legacy_env_credentials) {
            loader = loader.credentials_provider(credentials);
        }
        if let Some(region) = self.region {
            loader = loader.region(region);
        }
        let shared_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint_url) = self.endpoint_url {
            s3_config = s3_config.endpoint_url(endpoint_url);
        }
        if let Some(force_path_style) = self.force_path_style {
            s3_config = s3_config.force_path_style(force_path_style);
        }

        let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
        Builder::default().client(s3_client).build()
    }
}

/// Static credentials from `AWS_ACCESS_KEY` / `AWS_SECRET_ACCESS_KEY` when both are set and the
/// standard `AWS_ACCESS_KEY_ID` is not
fn legacy_env_credentials() -> Option<Credentials> {
    if std::env::var_os(ACCESS_KEY_ID_ENV).is_some() {
        return None;
    }
    let access_key_id = std::env::var(LEGACY_ACCESS_KEY_ENV).ok()?;
    let secret_access_key = std::env::var(SECRET_ACCESS_KEY_ENV).ok()?;
    tracing::debug!("using static credentials from {LEGACY_ACCESS_KEY_ENV}");
    Some(Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    ))
}
