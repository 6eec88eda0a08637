//! Order domain events and the notification handler that consumes them.
//!
//! The order-update use case emits an [`OrderEvent`] describing what
//! happened; [`dispatch`] decides whether anyone needs to hear about it.
//! Keeping this out of the repository means persistence never creates
//! notifications as a side effect, and a re-saved unchanged status fires
//! nothing.

use bazaar_core::{OrderId, OrderStatus, UserId};
use sqlx::PgPool;

use crate::db::{NotificationRepository, RepositoryError};

/// Something that happened to an order.
#[derive(Debug, Clone, Copy)]
pub enum OrderEvent {
    /// An order's status was written. `from == to` when the write was a
    /// no-op re-save.
    StatusChanged {
        order_id: OrderId,
        owner: UserId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// The notification a given event should produce, if any.
///
/// Only a genuine *transition* (old value ≠ new value) into `shipped` or
/// `delivered` produces one.
fn notification_for(event: &OrderEvent) -> Option<(String, String)> {
    let OrderEvent::StatusChanged {
        order_id, from, to, ..
    } = event;

    if from == to {
        return None;
    }

    match to {
        OrderStatus::Shipped => Some((
            "Order Shipped".to_owned(),
            format!("Your order #{order_id} has been shipped!"),
        )),
        OrderStatus::Delivered => Some((
            "Order Delivered".to_owned(),
            format!("Your order #{order_id} has been delivered!"),
        )),
        _ => None,
    }
}

/// Handle an order event, creating a notification where one is due.
///
/// # Errors
///
/// Returns `RepositoryError` if the notification insert fails.
pub async fn dispatch(pool: &PgPool, event: OrderEvent) -> Result<(), RepositoryError> {
    let Some((title, message)) = notification_for(&event) else {
        return Ok(());
    };

    let OrderEvent::StatusChanged {
        order_id, owner, to, ..
    } = event;

    NotificationRepository::new(pool)
        .create(owner, &title, &message)
        .await?;

    tracing::info!(
        order_id = %order_id,
        user_id = %owner,
        status = %to,
        "Order status notification created"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_changed(from: OrderStatus, to: OrderStatus) -> OrderEvent {
        OrderEvent::StatusChanged {
            order_id: OrderId::new(7),
            owner: UserId::new(1),
            from,
            to,
        }
    }

    #[test]
    fn test_transition_to_shipped_notifies() {
        let (title, message) =
            notification_for(&status_changed(OrderStatus::Pending, OrderStatus::Shipped))
                .expect("shipped transition should notify");
        assert!(title.contains("Shipped"));
        assert!(message.contains("#7"));
    }

    #[test]
    fn test_transition_to_delivered_notifies() {
        let (title, message) =
            notification_for(&status_changed(OrderStatus::Shipped, OrderStatus::Delivered))
                .expect("delivered transition should notify");
        assert!(title.contains("Delivered"));
        assert!(message.contains("#7"));
    }

    #[test]
    fn test_unchanged_status_does_not_refire() {
        // Re-saving "shipped" over "shipped" must not duplicate the
        // notification.
        assert!(
            notification_for(&status_changed(OrderStatus::Shipped, OrderStatus::Shipped))
                .is_none()
        );
        assert!(notification_for(&status_changed(
            OrderStatus::Delivered,
            OrderStatus::Delivered
        ))
        .is_none());
    }

    #[test]
    fn test_other_transitions_are_silent() {
        assert!(notification_for(&status_changed(
            OrderStatus::Pending,
            OrderStatus::Processing
        ))
        .is_none());
        assert!(notification_for(&status_changed(
            OrderStatus::Shipped,
            OrderStatus::Cancelled
        ))
        .is_none());
    }
}
