// ABOUTME: In-process stand-ins for the payment processor, the invoice service and the mailer
// ABOUTME: Record every call and fail on demand so workflows can be tested without the network

use std::sync::Mutex;

use async_trait::async_trait;
use widget_store::errors::{AppError, AppResult};
use widget_store::invoice::{Invoice, InvoiceSender};
use widget_store::mailer::{MailMessage, Mailer};
use widget_store::payments::{
    CardDetails, PaymentCustomer, PaymentError, PaymentIntent, PaymentProvider, PaymentResult,
    Refund, Subscription,
};

/// Processor operations that can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    CreatePaymentIntent,
    RetrievePaymentIntent,
    GetPaymentMethod,
    CreateCustomer,
    SubscribeToPlan,
    Refund,
    CancelSubscription,
}

/// Payment provider returning canned card data
#[derive(Default)]
pub struct MockPaymentProvider {
    failures: Mutex<Vec<(MockOperation, String)>>,
    calls: Mutex<Vec<String>>,
    intent_status: Mutex<Option<String>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail with the processor error `code`
    pub fn fail(&self, operation: MockOperation, code: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((operation, code.to_owned()));
    }

    /// Report retrieved intents with `status` instead of `succeeded`
    pub fn set_intent_status(&self, status: &str) {
        *self.intent_status.lock().unwrap() = Some(status.to_owned());
    }

    /// Calls made so far, formatted as `operation:argument`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: MockOperation, call: String) -> PaymentResult<()> {
        self.calls.lock().unwrap().push(call);
        let failures = self.failures.lock().unwrap();
        match failures.iter().find(|(op, _)| *op == operation) {
            Some((_, code)) => Err(PaymentError::Rejected {
                code: code.clone(),
                message: format!("mock {code}"),
            }),
            None => Ok(()),
        }
    }
}

/// Canned succeeded intent
fn intent(id: &str, amount: i64, currency: &str) -> PaymentIntent {
    PaymentIntent {
        id: id.to_owned(),
        amount,
        currency: currency.to_owned(),
        status: "succeeded".to_owned(),
        client_secret: Some(format!("{id}_secret")),
        latest_charge: Some(format!("ch_{id}")),
        payment_method: None,
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_payment_intent(
        &self,
        currency: &str,
        amount: i64,
    ) -> PaymentResult<PaymentIntent> {
        self.record(
            MockOperation::CreatePaymentIntent,
            format!("create_payment_intent:{amount}"),
        )?;
        Ok(intent("pi_new", amount, currency))
    }

    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent> {
        self.record(
            MockOperation::RetrievePaymentIntent,
            format!("retrieve_payment_intent:{id}"),
        )?;
        let mut retrieved = intent(id, 1000, "cad");
        if let Some(status) = self.intent_status.lock().unwrap().clone() {
            retrieved.status = status;
            retrieved.latest_charge = None;
        }
        Ok(retrieved)
    }

    async fn get_payment_method(&self, id: &str) -> PaymentResult<CardDetails> {
        self.record(
            MockOperation::GetPaymentMethod,
            format!("get_payment_method:{id}"),
        )?;
        Ok(CardDetails {
            last_four: "4242".to_owned(),
            expiry_month: 12,
            expiry_year: 2030,
            brand: "visa".to_owned(),
        })
    }

    async fn create_customer(
        &self,
        payment_method: &str,
        email: &str,
    ) -> PaymentResult<PaymentCustomer> {
        self.record(
            MockOperation::CreateCustomer,
            format!("create_customer:{payment_method}"),
        )?;
        Ok(PaymentCustomer {
            id: "cus_mock".to_owned(),
            email: Some(email.to_owned()),
        })
    }

    async fn subscribe_to_plan(
        &self,
        customer: &PaymentCustomer,
        plan: &str,
        _email: &str,
        _last_four: &str,
    ) -> PaymentResult<Subscription> {
        self.record(
            MockOperation::SubscribeToPlan,
            format!("subscribe_to_plan:{}:{plan}", customer.id),
        )?;
        Ok(Subscription {
            id: "sub_mock".to_owned(),
            status: "active".to_owned(),
            cancel_at_period_end: false,
        })
    }

    async fn refund(&self, payment_intent: &str, amount: i64) -> PaymentResult<Refund> {
        self.record(
            MockOperation::Refund,
            format!("refund:{payment_intent}:{amount}"),
        )?;
        Ok(Refund {
            id: "re_mock".to_owned(),
            amount,
            status: "succeeded".to_owned(),
        })
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> PaymentResult<Subscription> {
        self.record(
            MockOperation::CancelSubscription,
            format!("cancel_subscription:{subscription_id}"),
        )?;
        Ok(Subscription {
            id: subscription_id.to_owned(),
            status: "active".to_owned(),
            cancel_at_period_end: true,
        })
    }
}

/// Invoice sender that keeps every invoice it was given
#[derive(Default)]
pub struct RecordingInvoiceSender {
    sent: Mutex<Vec<Invoice>>,
    failing: Mutex<bool>,
}

impl RecordingInvoiceSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following invoice with an external service error
    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<Invoice> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvoiceSender for RecordingInvoiceSender {
    async fn send_invoice(&self, invoice: &Invoice) -> AppResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::external_service(
                "invoice-service",
                "connection refused",
            ));
        }
        self.sent.lock().unwrap().push(invoice.clone());
        Ok(())
    }
}

/// Mailer that keeps every message it was given
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
