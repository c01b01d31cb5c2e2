use super::utils::{all_of, any_of, as_list, as_str, compliant_if, is_true_opt};
use crate::rule::{Rule, RuleContext, RuleError, RuleResult, concrete};
use stackguard_types::{Level, ids};

const BUCKET: &str = "AWS::S3::Bucket";

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(ids::RULE_S3_BUCKET_ENCRYPTION, Level::Error, bucket_encryption)
            .info("The S3 bucket does not have default server-side encryption enabled.")
            .explanation(
                "Default encryption ensures every object written to the bucket is encrypted at rest, \
                 including objects uploaded by clients that do not request encryption.",
            )
            .applies_to(&[BUCKET]),
        Rule::new(ids::RULE_S3_PUBLIC_ACCESS_BLOCK, Level::Error, public_access_block)
            .info("The S3 bucket does not block all forms of public access.")
            .explanation(
                "All four public access block settings must be enabled so that neither ACLs nor \
                 bucket policies can expose objects to anonymous principals.",
            )
            .applies_to(&[BUCKET]),
        Rule::new(ids::RULE_S3_VERSIONING, Level::Warn, versioning)
            .info("The S3 bucket does not have versioning enabled.")
            .explanation(
                "Versioning preserves prior object versions so that accidental deletes and \
                 overwrites can be recovered.",
            )
            .applies_to(&[BUCKET]),
    ]
}

fn bucket_encryption(ctx: &RuleContext<'_>) -> RuleResult {
    let Some(rules) = ctx.property_at("BucketEncryption", "/ServerSideEncryptionConfiguration")?
    else {
        return Ok(compliant_if(false));
    };
    let ok = any_of(as_list(&rules)?.into_iter().map(|rule| -> Result<bool, RuleError> {
        let Some(default) = concrete(rule)?.get("ServerSideEncryptionByDefault") else {
            return Ok(false);
        };
        let algorithm = as_str(concrete(default)?.get("SSEAlgorithm"))?;
        Ok(algorithm.is_some_and(|alg| !alg.is_empty()))
    }))?;
    Ok(compliant_if(ok))
}

fn public_access_block(ctx: &RuleContext<'_>) -> RuleResult {
    let Some(cfg) = ctx.property("PublicAccessBlockConfiguration")? else {
        return Ok(compliant_if(false));
    };
    let cfg = concrete(&cfg)?;
    let ok = all_of(
        [
            "BlockPublicAcls",
            "BlockPublicPolicy",
            "IgnorePublicAcls",
            "RestrictPublicBuckets",
        ]
        .iter()
        .map(|key| is_true_opt(cfg.get(*key))),
    )?;
    Ok(compliant_if(ok))
}

fn versioning(ctx: &RuleContext<'_>) -> RuleResult {
    let status = ctx.property_at("VersioningConfiguration", "/Status")?;
    let status = as_str(status.as_ref())?;
    Ok(compliant_if(
        status.is_some_and(|s| s.eq_ignore_ascii_case("Enabled")),
    ))
}
