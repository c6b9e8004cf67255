//! Mapping between the customer ERP and TracOS workorder representations.
//!
//! The mapping is lossy: the customer's "canceled" and "deleted" flags both
//! become the `cancelled` status, and on the way back `isDeleted` is taken
//! from the separate `deleted` field rather than from the status. A record
//! sent through both directions therefore does not always come back equal.

use tracos_sync_api::SyncError;

use crate::models::customer::CustomerWorkorderModel;
use crate::models::tracos::{TracosWorkorderModel, WorkorderStatus};

pub fn workorder_title(order_no: i64) -> String {
    format!("Example workorder #{order_no}")
}

/// Resolves the customer flags to a status; the first matching rule wins.
pub fn customer_status_to_tracos(
    customer: &CustomerWorkorderModel,
) -> Result<WorkorderStatus, SyncError> {
    if customer.is_active {
        return Ok(WorkorderStatus::InProgress);
    }
    if customer.is_canceled || customer.is_deleted {
        return Ok(WorkorderStatus::Cancelled);
    }
    if customer.is_pending {
        return Ok(WorkorderStatus::Pending);
    }
    if customer.is_done {
        return Ok(WorkorderStatus::Completed);
    }
    if customer.is_on_hold {
        return Ok(WorkorderStatus::OnHold);
    }
    Err(SyncError::Translation(format!(
        "Workorder #{} has no status flag set",
        customer.order_no
    )))
}

pub fn customer_to_tracos(
    customer: &CustomerWorkorderModel,
) -> Result<TracosWorkorderModel, SyncError> {
    Ok(TracosWorkorderModel {
        id: None,
        number: customer.order_no,
        status: customer_status_to_tracos(customer)?,
        title: workorder_title(customer.order_no),
        description: customer.summary.clone(),
        created_at: customer.creation_date,
        updated_at: customer.last_update_date,
        deleted: customer.is_deleted,
        deleted_at: customer.deleted_date,
        is_synced: customer.is_synced,
        synced_at: None,
    })
}

/// Outbound records are always flagged synced from the customer's side.
pub fn tracos_to_customer(workorder: &TracosWorkorderModel) -> CustomerWorkorderModel {
    CustomerWorkorderModel {
        order_no: workorder.number,
        is_active: workorder.status == WorkorderStatus::InProgress,
        is_canceled: workorder.status == WorkorderStatus::Cancelled,
        is_deleted: workorder.deleted,
        is_done: workorder.status == WorkorderStatus::Completed,
        is_on_hold: workorder.status == WorkorderStatus::OnHold,
        is_pending: workorder.status == WorkorderStatus::Pending,
        is_synced: true,
        summary: workorder.description.clone(),
        creation_date: workorder.created_at,
        last_update_date: workorder.updated_at,
        deleted_date: workorder.deleted_at,
    }
}
