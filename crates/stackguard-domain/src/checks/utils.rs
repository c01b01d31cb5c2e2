use crate::rule::{ComplianceResult, RuleError, concrete};
use serde_json::Value;

/// CloudFormation accepts booleans as JSON booleans or as `"true"`/`"false"` strings.
pub fn is_true(value: &Value) -> Result<bool, RuleError> {
    Ok(match concrete(value)? {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

pub fn is_true_opt(value: Option<&Value>) -> Result<bool, RuleError> {
    value.map(is_true).unwrap_or(Ok(false))
}

/// The string form of a scalar; `None` for absent or non-string values.
pub fn as_str(value: Option<&Value>) -> Result<Option<&str>, RuleError> {
    match value {
        Some(v) => Ok(concrete(v)?.as_str()),
        None => Ok(None),
    }
}

/// A scalar or an array of scalars, viewed as a list.
pub fn as_list(value: &Value) -> Result<Vec<&Value>, RuleError> {
    Ok(match concrete(value)? {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

/// An unresolved intrinsic still counts as set.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// True if any item is true. An error only surfaces when no item settles the answer.
pub fn any_of<I>(items: I) -> Result<bool, RuleError>
where
    I: IntoIterator<Item = Result<bool, RuleError>>,
{
    let mut pending = None;
    for item in items {
        match item {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(err) => {
                pending.get_or_insert(err);
            }
        }
    }
    pending.map_or(Ok(false), Err)
}

/// True if every item is true. An error only surfaces when no item settles the answer.
pub fn all_of<I>(items: I) -> Result<bool, RuleError>
where
    I: IntoIterator<Item = Result<bool, RuleError>>,
{
    let mut pending = None;
    for item in items {
        match item {
            Ok(false) => return Ok(false),
            Ok(true) => {}
            Err(err) => {
                pending.get_or_insert(err);
            }
        }
    }
    pending.map_or(Ok(true), Err)
}

pub fn compliant_if(ok: bool) -> ComplianceResult {
    if ok {
        ComplianceResult::Compliant
    } else {
        ComplianceResult::NonCompliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_true_accepts_bool_and_string_forms() {
        assert_eq!(is_true(&json!(true)), Ok(true));
        assert_eq!(is_true(&json!("TRUE")), Ok(true));
        assert_eq!(is_true(&json!("yes")), Ok(false));
        assert_eq!(is_true(&json!(1)), Ok(false));
        assert_eq!(is_true_opt(None), Ok(false));
    }

    #[test]
    fn unresolved_intrinsics_are_errors() {
        let intrinsic = json!({ "Ref": "Flag" });
        assert!(matches!(is_true(&intrinsic), Err(RuleError::Unresolved { .. })));
        assert!(matches!(as_str(Some(&intrinsic)), Err(RuleError::Unresolved { .. })));
        assert!(matches!(as_list(&intrinsic), Err(RuleError::Unresolved { .. })));
    }

    #[test]
    fn as_list_wraps_scalars() {
        assert_eq!(as_list(&json!("*")), Ok(vec![&json!("*")]));
        assert_eq!(as_list(&json!(["a", "b"])).map(|l| l.len()), Ok(2));
        assert_eq!(as_list(&Value::Null), Ok(Vec::new()));
    }

    #[test]
    fn is_present_rejects_blank_strings() {
        assert!(!is_present(Some(&json!("  "))));
        assert!(!is_present(Some(&Value::Null)));
        assert!(is_present(Some(&json!("alias/key"))));
        assert!(is_present(Some(&json!({"Ref": "Key"}))));
    }

    #[test]
    fn combinators_only_fail_when_the_answer_is_open() {
        let unknown = || is_true(&json!({ "Ref": "Flag" }));

        assert_eq!(any_of([unknown(), Ok(true)]), Ok(true));
        assert!(any_of([unknown(), Ok(false)]).is_err());
        assert_eq!(any_of(Vec::new()), Ok(false));

        assert_eq!(all_of([unknown(), Ok(false)]), Ok(false));
        assert!(all_of([Ok(true), unknown()]).is_err());
        assert_eq!(all_of(Vec::new()), Ok(true));
    }
}
