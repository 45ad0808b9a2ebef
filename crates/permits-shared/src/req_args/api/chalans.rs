use crate::{amount::Amount, errors::ValidationError};

/// Body of `/chalans/{id}/mark_as_paid/`
#[derive(Debug, serde::Serialize, Clone, PartialEq)]
pub struct MarkPaidReqArgs {
    pub payment_amount: Amount,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payment_reference: String,
}

impl MarkPaidReqArgs {
    pub fn from_input(amount: &str, reference: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            payment_amount: Amount::parse_positive_field(amount, "Payment amount")?,
            payment_reference: reference.trim().to_string(),
        })
    }
}

/// Body of `/chalans/{id}/update_fees/`
#[derive(Debug, serde::Serialize, Clone, PartialEq)]
pub struct UpdateFeesReqArgs {
    pub fees_amount: Amount,
}

impl UpdateFeesReqArgs {
    pub fn from_input(amount: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            fees_amount: Amount::parse_positive_field(amount, "Fees amount")?,
        })
    }
}

/// Body of `/chalans/{id}/cancel/`
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct CancelReqArgs {
    pub reason: String,
}

impl CancelReqArgs {
    pub fn from_input(reason: &str) -> Result<Self, ValidationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::Required("Cancellation reason"));
        }
        Ok(Self {
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_reference_optional() {
        let args = MarkPaidReqArgs::from_input("1500", " ").unwrap();
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            serde_json::json!({"payment_amount": "1500.00"})
        );
    }

    #[test]
    fn zero_payment_rejected() {
        assert_eq!(
            MarkPaidReqArgs::from_input("0", "REF-1").unwrap_err(),
            ValidationError::NotPositive("Payment amount")
        );
    }

    #[test]
    fn cancel_requires_reason() {
        assert_eq!(
            CancelReqArgs::from_input("  ").unwrap_err(),
            ValidationError::Required("Cancellation reason")
        );
    }
}
