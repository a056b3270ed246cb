// handlers/protected/expenses/mod.rs - /expenses/{simple,recurring,credit-card}
//
// The three kinds share one route shape:
//   GET    /expenses/K            list, filtered by query string
//   POST   /expenses/K            create
//   PUT    /expenses/K[/:id]      merge-patch update (id from path or body)
//   GET    /expenses/K/:id        fetch one
//   DELETE /expenses/K/:id        delete
//   GET    /expenses/K/summary    totals for ?start_date=&end_date=

pub mod credit_card;
pub mod recurring;
pub mod simple;

use uuid::Uuid;

use crate::error::ApiError;

/// The id of the row being updated. A path id and a body id must agree.
pub(crate) fn resolve_update_id(path: Option<Uuid>, body: Option<Uuid>) -> Result<Uuid, ApiError> {
    match (path, body) {
        (Some(p), Some(b)) if p != b => Err(ApiError::field_error(
            "id",
            "id in the body does not match the id in the path",
        )),
        (Some(id), _) | (None, Some(id)) => Ok(id),
        (None, None) => Err(ApiError::field_error("id", "id is required")),
    }
}
