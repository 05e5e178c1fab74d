//! Order-line workflow.
//!
//! ```text
//! DISH:     pending ──► in_preparation ──► in_delivery ──► completed
//!              │
//!              └──► cancelled   (portions go back to the dish)
//!
//! PRODUCT:  pending ──► in_delivery ──► completed   (FIFO depletion)
//!              │
//!              └──► cancelled
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{OrderItem, OrderLineState};

/// Side effect a transition requires besides the state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TransitionEffect {
    None,
    /// Give `quantity` portions back to the dish.
    RestockDish { dish_id: String, quantity: i64 },
    /// Take `quantity` units of the product from its lots. Only applied when
    /// the product tracks inventory.
    DepleteStock { product_id: String, quantity: i64 },
}

/// Validates a state change and returns the effect it carries.
///
/// ## Errors
/// `InvalidTransition` for anything outside the workflow, including a
/// transition to the current state.
pub fn plan_transition(
    item: &OrderItem,
    quantity: i64,
    from: OrderLineState,
    to: OrderLineState,
) -> CoreResult<TransitionEffect> {
    use OrderLineState::*;

    match (item, from, to) {
        (OrderItem::Dish(dish_id), Pending, Cancelled) => Ok(TransitionEffect::RestockDish {
            dish_id: dish_id.clone(),
            quantity,
        }),
        (OrderItem::Dish(_), Pending, InPreparation)
        | (OrderItem::Dish(_), InPreparation, InDelivery)
        | (OrderItem::Dish(_), InDelivery, Completed) => Ok(TransitionEffect::None),

        (OrderItem::Product(_), Pending, Cancelled) | (OrderItem::Product(_), Pending, InDelivery) => {
            Ok(TransitionEffect::None)
        }
        (OrderItem::Product(product_id), InDelivery, Completed) => Ok(TransitionEffect::DepleteStock {
            product_id: product_id.clone(),
            quantity,
        }),

        _ => Err(CoreError::InvalidTransition { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderLineState::*;

    fn dish() -> OrderItem {
        OrderItem::Dish("lomo".into())
    }

    fn product() -> OrderItem {
        OrderItem::Product("chicha".into())
    }

    #[test]
    fn test_dish_happy_path() {
        assert_eq!(plan_transition(&dish(), 2, Pending, InPreparation).unwrap(), TransitionEffect::None);
        assert_eq!(plan_transition(&dish(), 2, InPreparation, InDelivery).unwrap(), TransitionEffect::None);
        assert_eq!(plan_transition(&dish(), 2, InDelivery, Completed).unwrap(), TransitionEffect::None);
    }

    #[test]
    fn test_dish_cancel_restocks() {
        assert_eq!(
            plan_transition(&dish(), 3, Pending, Cancelled).unwrap(),
            TransitionEffect::RestockDish {
                dish_id: "lomo".into(),
                quantity: 3
            }
        );
    }

    #[test]
    fn test_product_completion_depletes() {
        assert_eq!(plan_transition(&product(), 4, Pending, InDelivery).unwrap(), TransitionEffect::None);
        assert_eq!(
            plan_transition(&product(), 4, InDelivery, Completed).unwrap(),
            TransitionEffect::DepleteStock {
                product_id: "chicha".into(),
                quantity: 4
            }
        );
    }

    #[test]
    fn test_product_skips_kitchen() {
        assert!(matches!(
            plan_transition(&product(), 1, Pending, InPreparation),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_rejected_transitions() {
        for (from, to) in [
            (Pending, Completed),
            (Pending, Pending),
            (InPreparation, Cancelled),
            (Completed, Pending),
            (Cancelled, Pending),
            (InDelivery, Cancelled),
        ] {
            assert!(
                plan_transition(&dish(), 1, from, to).is_err(),
                "{from} -> {to} should be rejected"
            );
        }
        assert!(plan_transition(&product(), 1, Completed, Cancelled).is_err());
    }
}
