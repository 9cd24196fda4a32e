//! Role reconciliation and application.
//!
//! [`reconcile::reconcile`] is a pure function from a membership record to a
//! [`RoleDelta`](crate::model::role::RoleDelta); [`apply::RoleApplier`] pushes
//! a delta to Discord through a [`apply::RoleGateway`].

pub mod apply;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod fake;
