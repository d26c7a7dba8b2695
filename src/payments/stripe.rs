// ABOUTME: Stripe REST client implementing PaymentProvider with form-encoded requests
// ABOUTME: Authenticates with the secret key and decodes Stripe error codes into PaymentError

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use super::{
    CardDetails, PaymentCustomer, PaymentError, PaymentIntent, PaymentProvider, PaymentResult,
    Refund, Subscription,
};
use crate::config::StripeConfig;
use crate::utils::http_client::payment_client;

/// Error envelope of a failed Stripe request
#[derive(Debug, Default, Deserialize)]
struct StripeErrorEnvelope {
    #[serde(default)]
    error: StripeErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentMethod {
    card: Option<StripeCard>,
}

#[derive(Debug, Deserialize)]
struct StripeCard {
    last4: String,
    exp_month: i64,
    exp_year: i64,
    #[serde(default)]
    brand: String,
}

/// Stripe API client
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret: String,
    api_base: String,
}

impl StripeClient {
    /// Create a client from configuration
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self::with_client(payment_client(), config)
    }

    /// Create a client reusing an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client, config: &StripeConfig) -> Self {
        Self {
            client,
            secret: config.secret.clone(),
            api_base: config.api_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Resource url under the API base
    ///
    /// Each segment is percent-encoded, so ids taken from request bodies
    /// cannot add path segments, a query or a fragment.
    fn url(&self, segments: &[&str]) -> PaymentResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| PaymentError::InvalidRequest(format!("bad API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| PaymentError::InvalidRequest("API base cannot hold a path".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authenticated request and decode the reply
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> PaymentResult<T> {
        let response = request
            .bearer_auth(&self.secret)
            .send()
            .await
            .map_err(|e| {
                error!("Stripe {operation} request failed: {e}");
                PaymentError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let envelope: StripeErrorEnvelope = response.json().await.unwrap_or_default();
            let message = envelope
                .error
                .message
                .unwrap_or_else(|| status.to_string());
            error!(
                stripe.operation = operation,
                stripe.status = status.as_u16(),
                stripe.code = envelope.error.code.as_deref().unwrap_or(""),
                "Stripe rejected request: {message}"
            );
            return Err(match envelope.error.code {
                Some(code) => PaymentError::Rejected { code, message },
                None => PaymentError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        debug!("Stripe {operation} succeeded");
        response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(format!("{operation}: {e}")))
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_payment_intent(
        &self,
        currency: &str,
        amount: i64,
    ) -> PaymentResult<PaymentIntent> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_owned()),
            ("payment_method_types[]", "card".to_owned()),
        ];
        let request = self.client.post(self.url(&["payment_intents"])?).form(&params);
        self.send(request, "create_payment_intent").await
    }

    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent> {
        let request = self.client.get(self.url(&["payment_intents", id])?);
        self.send(request, "retrieve_payment_intent").await
    }

    async fn get_payment_method(&self, id: &str) -> PaymentResult<CardDetails> {
        let request = self.client.get(self.url(&["payment_methods", id])?);
        let method: StripePaymentMethod = self.send(request, "get_payment_method").await?;

        let card = method.card.ok_or_else(|| {
            PaymentError::InvalidResponse(format!("payment method {id} is not a card"))
        })?;
        Ok(CardDetails {
            last_four: card.last4,
            expiry_month: card.exp_month,
            expiry_year: card.exp_year,
            brand: card.brand,
        })
    }

    async fn create_customer(
        &self,
        payment_method: &str,
        email: &str,
    ) -> PaymentResult<PaymentCustomer> {
        let params = [
            ("payment_method", payment_method),
            ("email", email),
            ("invoice_settings[default_payment_method]", payment_method),
        ];
        let request = self.client.post(self.url(&["customers"])?).form(&params);
        self.send(request, "create_customer").await
    }

    async fn subscribe_to_plan(
        &self,
        customer: &PaymentCustomer,
        plan: &str,
        email: &str,
        last_four: &str,
    ) -> PaymentResult<Subscription> {
        let params = [
            ("customer", customer.id.as_str()),
            ("items[0][plan]", plan),
            ("metadata[last_four]", last_four),
            ("metadata[cardholder_email]", email),
            ("expand[]", "latest_invoice.payment_intent"),
        ];
        let request = self.client.post(self.url(&["subscriptions"])?).form(&params);
        self.send(request, "subscribe_to_plan").await
    }

    async fn refund(&self, payment_intent: &str, amount: i64) -> PaymentResult<Refund> {
        let params = [
            ("payment_intent", payment_intent.to_owned()),
            ("amount", amount.to_string()),
        ];
        let request = self.client.post(self.url(&["refunds"])?).form(&params);
        self.send(request, "refund").await
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> PaymentResult<Subscription> {
        let params = [("cancel_at_period_end", "true")];
        let request = self
            .client
            .post(self.url(&["subscriptions", subscription_id])?)
            .form(&params);
        self.send(request, "cancel_subscription").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_decoding() {
        let envelope: StripeErrorEnvelope = serde_json::from_str(
            r#"{"error": {"code": "card_declined", "message": "Your card was declined.", "type": "card_error"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.code.as_deref(), Some("card_declined"));

        let empty: StripeErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert!(empty.error.code.is_none());
    }

    #[test]
    fn test_payment_intent_decoding_ignores_extra_fields() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id": "pi_123", "object": "payment_intent", "amount": 1000, "currency": "cad",
                "status": "succeeded", "client_secret": "pi_123_secret", "latest_charge": "ch_1",
                "payment_method": "pm_1"}"#,
        )
        .unwrap();
        assert_eq!(intent.latest_charge.as_deref(), Some("ch_1"));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = StripeClient::new(&StripeConfig {
            key: String::new(),
            secret: "sk_test".to_owned(),
            api_base: "https://api.stripe.com/v1/".to_owned(),
        });
        assert_eq!(
            client.url(&["payment_intents"]).unwrap().as_str(),
            "https://api.stripe.com/v1/payment_intents"
        );
    }

    #[test]
    fn test_url_encodes_ids_as_single_segments() {
        let client = StripeClient::new(&StripeConfig {
            key: String::new(),
            secret: "sk_test".to_owned(),
            api_base: "https://api.stripe.com/v1".to_owned(),
        });
        let url = client
            .url(&["payment_intents", "pi_1/../../customers?limit=100#x"])
            .unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let url = client.url(&["payment_methods", ".."]).unwrap();
        assert_eq!(url.as_str(), "https://api.stripe.com/v1/payment_methods");
    }

    #[test]
    fn test_invalid_api_base_is_reported() {
        let client = StripeClient::new(&StripeConfig {
            key: String::new(),
            secret: "sk_test".to_owned(),
            api_base: "not a url".to_owned(),
        });
        assert!(matches!(
            client.url(&["refunds"]),
            Err(PaymentError::InvalidRequest(_))
        ));
    }
}
