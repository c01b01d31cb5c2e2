//! Deferred value resolution.
//!
//! The engine never knows how a deferred value becomes concrete. It only relies on resolution
//! being side-effect free, and on [`CachingResolver`] to make it idempotent within one pass.

use crate::model::Token;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved(JsonValue),
    Unresolved { reason: String },
}

pub trait ValueResolver {
    fn resolve(&self, token: &Token) -> Resolution;
}

/// Resolves tokens from a fixed binding table; anything unbound stays unresolved.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    bindings: BTreeMap<Token, JsonValue>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, handle: &str, value: JsonValue) -> Self {
        self.bindings.insert(Token::new(handle), value);
        self
    }

    pub fn from_bindings(bindings: BTreeMap<Token, JsonValue>) -> Self {
        Self { bindings }
    }
}

impl ValueResolver for StaticResolver {
    fn resolve(&self, token: &Token) -> Resolution {
        match self.bindings.get(token) {
            Some(value) => Resolution::Resolved(value.clone()),
            None => Resolution::Unresolved {
                reason: "no binding is available before deployment".to_string(),
            },
        }
    }
}

/// Memoizes the first resolution of every token for the lifetime of one evaluation pass.
pub struct CachingResolver<'a> {
    inner: &'a dyn ValueResolver,
    cache: RefCell<BTreeMap<Token, Resolution>>,
}

impl<'a> CachingResolver<'a> {
    pub fn new(inner: &'a dyn ValueResolver) -> Self {
        Self {
            inner,
            cache: RefCell::new(BTreeMap::new()),
        }
    }
}

impl ValueResolver for CachingResolver<'_> {
    fn resolve(&self, token: &Token) -> Resolution {
        if let Some(hit) = self.cache.borrow().get(token) {
            return hit.clone();
        }
        let resolution = self.inner.resolve(token);
        self.cache
            .borrow_mut()
            .insert(token.clone(), resolution.clone());
        resolution
    }
}
