use super::utils::{compliant_if, is_present, is_true_opt};
use crate::rule::{ComplianceResult, Rule, RuleContext, RuleResult};
use stackguard_types::{Level, ids};

const VOLUME: &str = "AWS::EC2::Volume";
const DB_INSTANCE: &str = "AWS::RDS::DBInstance";
const DB_CLUSTER: &str = "AWS::RDS::DBCluster";

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(ids::RULE_EBS_VOLUME_ENCRYPTION, Level::Error, volume_encryption)
            .info("The EBS volume does not have encryption enabled.")
            .explanation(
                "Encrypted volumes protect data at rest and every snapshot taken from them.",
            )
            .applies_to(&[VOLUME]),
        Rule::new(ids::RULE_RDS_STORAGE_ENCRYPTED, Level::Error, storage_encrypted)
            .info("The RDS database does not have storage encryption enabled.")
            .explanation(
                "Storage encryption covers the database files, automated backups, read replicas \
                 and snapshots.",
            )
            .applies_to(&[DB_INSTANCE, DB_CLUSTER]),
    ]
}

fn volume_encryption(ctx: &RuleContext<'_>) -> RuleResult {
    Ok(compliant_if(is_true_opt(
        ctx.property("Encrypted")?.as_ref(),
    )?))
}

fn storage_encrypted(ctx: &RuleContext<'_>) -> RuleResult {
    let resource = ctx.resource();
    // Cluster members inherit encryption from the cluster, which is checked on its own.
    if resource.resource_type.as_str() == DB_INSTANCE
        && is_present(ctx.property("DBClusterIdentifier")?.as_ref())
    {
        return Ok(ComplianceResult::NotApplicable);
    }
    Ok(compliant_if(is_true_opt(
        ctx.property("StorageEncrypted")?.as_ref(),
    )?))
}
