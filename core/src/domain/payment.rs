//! Redirect to the payment page after a booking intent that needs payment.

use shared::BookingIntentResult;
use url::form_urlencoded;

/// Payment page URL for `result`, or `None` when no payment step is needed.
///
/// A payment step needs both `requires_payment` and a client secret; without
/// the secret the payment page could not confirm anything.
pub fn payment_redirect_url(payment_path: &str, result: &BookingIntentResult) -> Option<String> {
    if !result.requires_payment {
        return None;
    }
    let client_secret = result.client_secret.as_deref().filter(|s| !s.is_empty())?;

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("client_secret", client_secret);
    query.append_pair("amount", &result.amount.map(format_amount).unwrap_or_default());
    query.append_pair("payment_intent_id", result.payment_intent_id.as_deref().unwrap_or_default());
    if let Some(slot) = &result.slot {
        query.append_pair("slot", &slot.to_string());
    }

    Some(format!("{}?{}", payment_path, query.finish()))
}

/// Amounts come in minor units; print whole numbers without a fraction
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paid_result() -> BookingIntentResult {
        BookingIntentResult {
            requires_payment: true,
            client_secret: Some("cs_123".to_string()),
            amount: Some(5000.0),
            payment_intent_id: Some("pi_1".to_string()),
            slot: None,
            message: None,
        }
    }

    #[test]
    fn test_redirect_carries_payment_values() {
        let url = payment_redirect_url("/payment", &paid_result()).unwrap();

        assert!(url.starts_with("/payment?"));
        assert!(url.contains("client_secret=cs_123"));
        assert!(url.contains("amount=5000"));
        assert!(url.contains("payment_intent_id=pi_1"));
        assert!(!url.contains("slot="));
    }

    #[test]
    fn test_slot_summary_is_json_encoded() {
        let mut result = paid_result();
        result.slot = Some(json!({"id": 4, "subject": "Math & Physics"}));

        let url = payment_redirect_url("/student/payment", &result).unwrap();
        let query = url.split_once('?').unwrap().1;
        let slot = form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "slot")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        let decoded: serde_json::Value = serde_json::from_str(&slot).unwrap();
        assert_eq!(decoded, json!({"id": 4, "subject": "Math & Physics"}));
    }

    #[test]
    fn test_no_redirect_without_payment_or_secret() {
        let mut result = paid_result();
        result.client_secret = None;
        assert_eq!(payment_redirect_url("/payment", &result), None);

        result.client_secret = Some(String::new());
        assert_eq!(payment_redirect_url("/payment", &result), None);

        let mut free = paid_result();
        free.requires_payment = false;
        assert_eq!(payment_redirect_url("/payment", &free), None);
    }

    #[test]
    fn test_fractional_amount() {
        let mut result = paid_result();
        result.amount = Some(49.5);
        assert!(payment_redirect_url("/payment", &result).unwrap().contains("amount=49.5"));
    }
}
