//! Concurrent fan-out joiners.
//!
//! Two deliberately distinct primitives: health aggregation needs every
//! probe's individual outcome and must never fail as a whole, while stats
//! aggregation is all-or-nothing. Reusing one joiner for both would either
//! hide probe results or turn a single slow service into a failed health
//! check.

use crate::error::GatewayError;
use futures::future::{join_all, try_join_all};
use std::future::Future;

/// Result-collecting joiner: drives every future to completion and
/// returns each outcome in input order. Never short-circuits.
pub async fn settle_all<F, T>(futures: Vec<F>) -> Vec<Result<T, GatewayError>>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    join_all(futures).await
}

/// Strict joiner: propagates the first failure, discarding the rest.
pub async fn all_or_first_error<F, T>(futures: Vec<F>) -> Result<Vec<T>, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    try_join_all(futures).await
}
