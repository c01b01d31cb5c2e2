//! IAM policy checks.
//!
//! Policy documents are walked statement by statement rather than matched as serialized text, so
//! key order, whitespace and scalar-versus-array forms do not change the result.

use super::utils::{all_of, any_of, as_list, as_str, compliant_if};
use crate::rule::{Rule, RuleContext, RuleError, RuleResult, concrete};
use serde_json::Value;
use stackguard_types::{Level, ids};

const POLICY: &str = "AWS::IAM::Policy";
const MANAGED_POLICY: &str = "AWS::IAM::ManagedPolicy";
const ROLE: &str = "AWS::IAM::Role";
const USER: &str = "AWS::IAM::User";
const GROUP: &str = "AWS::IAM::Group";

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(ids::RULE_IAM_NO_ADMIN_ACCESS, Level::Error, no_admin_access)
            .info("The IAM policy grants full administrative access.")
            .explanation(
                "A statement that allows every action on every resource removes all least-privilege \
                 boundaries. Grant only the actions and resources the principal needs.",
            )
            .applies_to(&[POLICY, MANAGED_POLICY, ROLE, USER, GROUP]),
    ]
}

fn no_admin_access(ctx: &RuleContext<'_>) -> RuleResult {
    let mut documents = Vec::new();
    if let Some(doc) = ctx.property("PolicyDocument")? {
        documents.push(doc);
    }
    if let Some(inline) = ctx.property("Policies")? {
        for policy in as_list(&inline)? {
            if let Some(doc) = concrete(policy)?.get("PolicyDocument") {
                documents.push(doc.clone());
            }
        }
    }

    let admin = any_of(documents.iter().map(grants_admin))?;
    Ok(compliant_if(!admin))
}

/// Whether any statement of `document` allows `*` actions on `*` resources.
pub(crate) fn grants_admin(document: &Value) -> Result<bool, RuleError> {
    let parsed;
    let document = match concrete(document)? {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).map_err(|e| {
                RuleError::Invalid(format!("policy document is not valid JSON: {e}"))
            })?;
            &parsed
        }
        other => other,
    };

    let statements = match document.get("Statement").map(concrete).transpose()? {
        None | Some(Value::Null) => return Ok(false),
        Some(s @ (Value::Object(_) | Value::Array(_))) => as_list(s)?,
        Some(other) => {
            return Err(RuleError::Invalid(format!(
                "policy Statement must be an object or an array, found {other}"
            )));
        }
    };

    any_of(statements.into_iter().map(is_admin_statement))
}

fn is_admin_statement(statement: &Value) -> Result<bool, RuleError> {
    let statement = concrete(statement)?;
    all_of([
        as_str(statement.get("Effect")).map(|effect| effect == Some("Allow")),
        any_str(statement.get("Action"), |a| a == "*" || a == "*:*"),
        any_str(statement.get("Resource"), |r| r == "*"),
    ])
}

fn any_str(value: Option<&Value>, pred: impl Fn(&str) -> bool) -> Result<bool, RuleError> {
    let Some(value) = value else {
        return Ok(false);
    };
    any_of(
        as_list(value)?
            .into_iter()
            .map(|item| as_str(Some(item)).map(|s| s.is_some_and(&pred))),
    )
}
