/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - introspector: Arc<dyn TokenIntrospector>, policy: Arc<Policy>
 * - Clone 前提で持つ (内部は Arc)。起動後は read-only
 */
use std::sync::Arc;

use crate::services::{introspection::TokenIntrospector, policy::Policy};

#[derive(Clone)]
pub struct AppState {
    pub introspector: Arc<dyn TokenIntrospector>,
    pub policy: Arc<Policy>,
}

impl AppState {
    pub fn new(introspector: Arc<dyn TokenIntrospector>, policy: Arc<Policy>) -> Self {
        Self {
            introspector,
            policy,
        }
    }
}
