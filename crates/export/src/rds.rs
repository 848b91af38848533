//! RDS `StartExportTask` client.
//!
//! Provides [`RdsExportService`], the production [`ExportService`]. Service
//! errors (duplicate identifier, missing permissions, invalid source state)
//! come back as [`ExportJobResult::Rejected`]; only failures to get an answer
//! at all are [`ServiceError`]s.

use async_trait::async_trait;
use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_rds::error::ProvideErrorMetadata;
use aws_sdk_rds::error::SdkError;
use aws_sdk_rds::operation::start_export_task::{StartExportTaskError, StartExportTaskOutput};
use tracing::{debug, info};

use snapex_core::{AwsConfig, ExportJobRequest};

use crate::service::{ExportJobResult, ExportService, ServiceError, DUPLICATE_JOB_CODE};

pub struct RdsExportService {
    client: aws_sdk_rds::Client,
}

impl RdsExportService {
    /// Build a client for `aws.region`, with static credentials and an
    /// endpoint override when configured.
    pub async fn new(aws: &AwsConfig) -> Self {
        let region = aws_sdk_rds::config::Region::new(aws.region.clone());

        // Build the RDS config directly: the shared loader also honours
        // AWS_ENDPOINT_URL from the environment, bypassing `aws.endpoint()`.
        let mut rds_config = aws_sdk_rds::Config::builder()
            .region(region.clone())
            .behavior_version(BehaviorVersion::latest());

        if let (Some(key_id), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "snapex-export-static",
            );
            rds_config = rds_config.credentials_provider(creds);
        } else {
            // Function role, container or instance credentials.
            let chain = DefaultCredentialsChain::builder().region(region).build().await;
            rds_config = rds_config.credentials_provider(chain);
        }
        if let Some(endpoint) = aws.endpoint() {
            rds_config = rds_config.endpoint_url(endpoint);
        }

        info!(region = %aws.region, "RdsExportService initialised");

        Self::from_client(aws_sdk_rds::Client::from_conf(rds_config.build()))
    }

    pub fn from_client(client: aws_sdk_rds::Client) -> Self {
        Self { client }
    }
}

/// Map a service-side error to a rejection, normalising the duplicate code.
fn rejection(err: &StartExportTaskError) -> ExportJobResult {
    let code = if err.is_export_task_already_exists_fault() {
        DUPLICATE_JOB_CODE.to_string()
    } else {
        err.code().unwrap_or("Unknown").to_string()
    };
    let reason = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    ExportJobResult::Rejected { code, reason }
}

/// Classify a StartExportTask response: service answers become results,
/// anything that never got an answer is a transport failure.
fn settle(
    request: &ExportJobRequest,
    response: Result<StartExportTaskOutput, SdkError<StartExportTaskError>>,
) -> Result<ExportJobResult, ServiceError> {
    match response {
        Ok(out) => Ok(ExportJobResult::Accepted {
            task_identifier: out
                .export_task_identifier()
                .unwrap_or(request.job_identifier.as_str())
                .to_string(),
            status: out.status().map(str::to_string),
        }),
        Err(e) => match e.as_service_error() {
            Some(service_err) => Ok(rejection(service_err)),
            None => Err(ServiceError::Transport(format!("StartExportTask failed: {e:?}"))),
        },
    }
}

#[async_trait]
impl ExportService for RdsExportService {
    async fn start_export(&self, request: &ExportJobRequest) -> Result<ExportJobResult, ServiceError> {
        debug!(
            job_identifier = %request.job_identifier,
            source = %request.source_reference,
            "Calling StartExportTask"
        );

        let mut op = self
            .client
            .start_export_task()
            .export_task_identifier(request.job_identifier.as_str())
            .source_arn(request.source_reference.as_str())
            .s3_bucket_name(&request.destination.bucket)
            .s3_prefix(&request.destination.prefix)
            .iam_role_arn(&request.delegated_identity)
            .kms_key_id(&request.encryption_key_handle);
        for item in &request.export_only {
            op = op.export_only(item);
        }

        settle(request, op.send().await)
    }

    fn name(&self) -> &str {
        "rds"
    }
}
