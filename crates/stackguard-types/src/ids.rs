//! Stable identifiers shared by the engine and its reporting surfaces.
//!
//! Rule ids are a dotted namespace (`s3.bucket_encryption`). Framework ids are short lowercase names.

/// Reserved pseudo-rule id for findings raised when a rule could not be evaluated to completion.
///
/// Suppressing this id on a resource silences validation failures of every rule on it.
pub const VALIDATION_FAILURE: &str = "StackguardValidationFailure";

// Frameworks
pub const FRAMEWORK_BASELINE: &str = "baseline";

// Rules: baseline
pub const RULE_S3_BUCKET_ENCRYPTION: &str = "s3.bucket_encryption";
pub const RULE_S3_PUBLIC_ACCESS_BLOCK: &str = "s3.public_access_block";
pub const RULE_S3_VERSIONING: &str = "s3.versioning";
pub const RULE_EBS_VOLUME_ENCRYPTION: &str = "ebs.volume_encryption";
pub const RULE_RDS_STORAGE_ENCRYPTED: &str = "rds.storage_encrypted";
pub const RULE_SQS_QUEUE_ENCRYPTION: &str = "sqs.queue_encryption";
pub const RULE_SNS_TOPIC_ENCRYPTION: &str = "sns.topic_encryption";
pub const RULE_IAM_NO_ADMIN_ACCESS: &str = "iam.no_admin_access";
