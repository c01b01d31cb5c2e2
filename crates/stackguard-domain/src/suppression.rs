use crate::model::{Suppression, SuppressionIndex};
use stackguard_types::ResourcePath;

/// Decides whether a rule's findings on a resource are discarded.
///
/// Reads only static suppression metadata. Invalid entries (blank rule id, reason shorter than
/// [`Suppression::MIN_REASON_CHARS`]) are treated as if they were not there.
#[derive(Clone, Copy, Debug)]
pub struct SuppressionResolver<'a> {
    index: &'a SuppressionIndex,
}

impl<'a> SuppressionResolver<'a> {
    pub fn new(index: &'a SuppressionIndex) -> Self {
        Self { index }
    }

    pub fn is_suppressed(&self, resource_id: &ResourcePath, rule_id: &str) -> bool {
        self.matching(resource_id, rule_id).is_some()
    }

    /// The suppression that silences `rule_id` on `resource_id`, if any.
    ///
    /// The resource's own list is consulted first, then ancestors (nearest first) for entries
    /// that apply to children.
    pub fn matching(&self, resource_id: &ResourcePath, rule_id: &str) -> Option<&'a Suppression> {
        let own = self
            .index
            .get(resource_id)
            .and_then(|list| find_valid(list, rule_id, false));
        if own.is_some() {
            return own;
        }
        resource_id.ancestors().find_map(|ancestor| {
            self.index
                .get(&ancestor)
                .and_then(|list| find_valid(list, rule_id, true))
        })
    }
}

fn find_valid<'a>(
    list: &'a [Suppression],
    rule_id: &str,
    inherited_only: bool,
) -> Option<&'a Suppression> {
    list.iter().find(|s| {
        s.rule_id == rule_id && s.is_valid() && (!inherited_only || s.applies_to_children)
    })
}
