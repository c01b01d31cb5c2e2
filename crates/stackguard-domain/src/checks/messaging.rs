use super::utils::{compliant_if, is_present, is_true_opt};
use crate::rule::{ComplianceResult, Rule, RuleContext, RuleResult};
use stackguard_types::{Level, ids};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(ids::RULE_SQS_QUEUE_ENCRYPTION, Level::Error, queue_encryption)
            .info("The SQS queue does not have server-side encryption enabled.")
            .explanation(
                "Messages may contain sensitive payloads; encrypt them with a KMS key or with \
                 SQS-managed encryption.",
            )
            .applies_to(&["AWS::SQS::Queue"]),
        Rule::new(ids::RULE_SNS_TOPIC_ENCRYPTION, Level::Warn, topic_encryption)
            .info("The SNS topic does not use a KMS key for server-side encryption.")
            .explanation("Encrypting topics keeps published messages unreadable at rest.")
            .applies_to(&["AWS::SNS::Topic"]),
    ]
}

fn queue_encryption(ctx: &RuleContext<'_>) -> RuleResult {
    if is_present(ctx.property("KmsMasterKeyId")?.as_ref()) {
        return Ok(ComplianceResult::Compliant);
    }
    Ok(compliant_if(is_true_opt(
        ctx.property("SqsManagedSseEnabled")?.as_ref(),
    )?))
}

fn topic_encryption(ctx: &RuleContext<'_>) -> RuleResult {
    Ok(compliant_if(is_present(
        ctx.property("KmsMasterKeyId")?.as_ref(),
    )))
}
