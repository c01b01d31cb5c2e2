use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - rule_id (the reserved id for validation failures)
/// - resource_id
/// - triggering rule id (validation failures only)
pub fn fingerprint_for_finding(rule_id: &str, resource_id: &str, triggered_by: Option<&str>) -> String {
    let mut parts = vec![rule_id, resource_id];
    if let Some(t) = triggered_by {
        parts.push(t);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
