// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transformation lookup for an invoice.

use crate::index::ReferenceIndex;
use crate::model::TransformationRule;

/// Resolves the transformation rules that apply to a delivery.
#[derive(Clone, Copy, Debug)]
pub struct TransformationResolver<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> TransformationResolver<'a> {
    /// Resolver over `index`.
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    /// Rules for `material_code` delivered to `facility_id`, in reference order.
    ///
    /// An empty slice means the material has no configured pathway at that
    /// facility; callers skip the invoice rather than fail it.
    pub fn resolve(&self, facility_id: &str, material_code: &str) -> &'a [TransformationRule] {
        self.index.transformations(facility_id, material_code)
    }
}
