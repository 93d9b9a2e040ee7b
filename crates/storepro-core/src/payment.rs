//! # Payment Workflow
//!
//! A small state machine capturing a tendered amount and deciding whether
//! the sale is fully paid.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │    Idle ──begin(cart)──► Capturing ──submit_tender──► Settled       │
//! │                              │            (amount >= due)           │
//! │                              │                                      │
//! │                           cancel()                                  │
//! │                              │                                      │
//! │                              ▼                                      │
//! │                          Cancelled                                  │
//! │                                                                     │
//! │  submit_tender with amount < due REJECTS (InsufficientPayment)      │
//! │  and stays in Capturing - no partial/layaway payments.              │
//! │                                                                     │
//! │  Settled and Cancelled are terminal: a workflow instance is         │
//! │  single-use. A new sale needs a new instance.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The amount due is SNAPSHOT at `begin`: later cart edits do not move the
//! goalposts mid-capture. The surrounding session discards the workflow if
//! it lets the cashier back into the cart.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Settlement};

// =============================================================================
// Workflow Phase
// =============================================================================

/// Externally visible phase of a [`PaymentWorkflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    /// No capture begun yet.
    Idle,
    /// Waiting for a tender against a snapshotted amount due.
    Capturing,
    /// A sufficient tender was accepted; a Settlement was produced.
    Settled,
    /// Capture abandoned; the cart is left untouched.
    Cancelled,
}

// =============================================================================
// Payment Workflow
// =============================================================================

/// Single-use tender-capture state machine.
#[derive(Debug, Clone)]
pub struct PaymentWorkflow {
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Capturing { amount_due: Money },
    Settled,
    Cancelled,
}

impl PaymentWorkflow {
    /// Creates a workflow in the Idle phase.
    pub fn new() -> Self {
        PaymentWorkflow { state: State::Idle }
    }

    /// The current phase.
    pub fn phase(&self) -> WorkflowPhase {
        match self.state {
            State::Idle => WorkflowPhase::Idle,
            State::Capturing { .. } => WorkflowPhase::Capturing,
            State::Settled => WorkflowPhase::Settled,
            State::Cancelled => WorkflowPhase::Cancelled,
        }
    }

    /// The snapshotted amount due, while Capturing.
    pub fn amount_due(&self) -> Option<Money> {
        match self.state {
            State::Capturing { amount_due } => Some(amount_due),
            _ => None,
        }
    }

    /// Transitions Idle → Capturing, snapshotting `cart.total()` as the
    /// amount due. Returns the snapshot.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] - nothing to pay for
    /// - [`CoreError::WrongPhase`] - the instance was already used
    pub fn begin(&mut self, cart: &Cart) -> CoreResult<Money> {
        match self.state {
            State::Idle => {
                if cart.is_empty() {
                    return Err(CoreError::EmptyCart);
                }
                let amount_due = cart.total();
                self.state = State::Capturing { amount_due };
                Ok(amount_due)
            }
            _ => Err(CoreError::WrongPhase {
                operation: "begin capture",
                phase: self.phase(),
            }),
        }
    }

    /// Submits a tender. Valid only while Capturing.
    ///
    /// ## Policy
    /// - `amount < due` → [`CoreError::InsufficientPayment`], phase stays
    ///   Capturing so the cashier can re-prompt
    /// - `amount >= due` → transitions to Settled and returns the
    ///   [`Settlement`] with `change = amount - due`
    pub fn submit_tender(
        &mut self,
        amount: Money,
        method: PaymentMethod,
    ) -> CoreResult<Settlement> {
        let amount_due = match self.state {
            State::Capturing { amount_due } => amount_due,
            _ => {
                return Err(CoreError::WrongPhase {
                    operation: "submit tender",
                    phase: self.phase(),
                })
            }
        };

        if amount < amount_due {
            return Err(CoreError::InsufficientPayment {
                due_cents: amount_due.cents(),
                tendered_cents: amount.cents(),
            });
        }

        let change = (amount - amount_due).max(Money::zero());
        self.state = State::Settled;

        Ok(Settlement {
            tendered_cents: amount.cents(),
            method,
            change_cents: change.cents(),
        })
    }

    /// Abandons the capture. Valid only while Capturing; the cart is left
    /// untouched (the caller decides whether to clear it).
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.state {
            State::Capturing { .. } => {
                self.state = State::Cancelled;
                Ok(())
            }
            _ => Err(CoreError::WrongPhase {
                operation: "cancel capture",
                phase: self.phase(),
            }),
        }
    }
}

impl Default for PaymentWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use chrono::Utc;

    fn cart_with_total(cents: i64) -> Cart {
        let mut cart = Cart::new();
        cart.add_product(&Product {
            sku: "X".to_string(),
            name: "X".to_string(),
            unit_cost_cents: cents,
            tax_rate_bps: 0,
            qty_on_hand: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();
        cart
    }

    #[test]
    fn test_begin_snapshots_amount_due() {
        let cart = cart_with_total(1211);
        let mut wf = PaymentWorkflow::new();

        let due = wf.begin(&cart).unwrap();
        assert_eq!(due.cents(), 1211);
        assert_eq!(wf.phase(), WorkflowPhase::Capturing);
        assert_eq!(wf.amount_due(), Some(Money::from_cents(1211)));
    }

    #[test]
    fn test_begin_rejects_empty_cart() {
        let mut wf = PaymentWorkflow::new();
        assert_eq!(wf.begin(&Cart::new()).unwrap_err(), CoreError::EmptyCart);
        assert_eq!(wf.phase(), WorkflowPhase::Idle);
    }

    /// Worked scenario: due $12.11, $10.00 rejected, $20.00 settles with
    /// $7.89 change.
    #[test]
    fn test_insufficient_then_sufficient_tender() {
        let cart = cart_with_total(1211);
        let mut wf = PaymentWorkflow::new();
        wf.begin(&cart).unwrap();

        let err = wf
            .submit_tender(Money::from_cents(1000), PaymentMethod::Cash)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientPayment {
                due_cents: 1211,
                tendered_cents: 1000
            }
        );
        // Rejection keeps us Capturing
        assert_eq!(wf.phase(), WorkflowPhase::Capturing);

        let settlement = wf
            .submit_tender(Money::from_cents(2000), PaymentMethod::Cash)
            .unwrap();
        assert_eq!(settlement.change_cents, 789);
        assert_eq!(wf.phase(), WorkflowPhase::Settled);
    }

    #[test]
    fn test_exact_tender_has_zero_change() {
        let cart = cart_with_total(1211);
        let mut wf = PaymentWorkflow::new();
        wf.begin(&cart).unwrap();

        let settlement = wf
            .submit_tender(Money::from_cents(1211), PaymentMethod::Debit)
            .unwrap();
        assert_eq!(settlement.change_cents, 0);
        assert_eq!(settlement.method, PaymentMethod::Debit);
    }

    #[test]
    fn test_workflow_is_single_use() {
        let cart = cart_with_total(500);
        let mut wf = PaymentWorkflow::new();
        wf.begin(&cart).unwrap();
        wf.submit_tender(Money::from_cents(500), PaymentMethod::Cash)
            .unwrap();

        // Everything is rejected once Settled
        assert!(matches!(
            wf.begin(&cart),
            Err(CoreError::WrongPhase { .. })
        ));
        assert!(matches!(
            wf.submit_tender(Money::from_cents(500), PaymentMethod::Cash),
            Err(CoreError::WrongPhase { .. })
        ));
        assert!(matches!(wf.cancel(), Err(CoreError::WrongPhase { .. })));
    }

    #[test]
    fn test_cancel_from_capturing() {
        let cart = cart_with_total(500);
        let mut wf = PaymentWorkflow::new();
        wf.begin(&cart).unwrap();
        wf.cancel().unwrap();
        assert_eq!(wf.phase(), WorkflowPhase::Cancelled);

        // Terminal: no restart on the same instance
        assert!(matches!(
            wf.begin(&cart),
            Err(CoreError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_submit_before_begin_is_rejected() {
        let mut wf = PaymentWorkflow::new();
        assert!(matches!(
            wf.submit_tender(Money::from_cents(100), PaymentMethod::Cash),
            Err(CoreError::WrongPhase { .. })
        ));
    }
}
