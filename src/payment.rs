//! Booster payment: the request handed to the wallet and the bounded wait on it.

use futures::future::{self, Either, LocalBoxFuture};
use serde::Serialize;
use thiserror::Error;

use crate::config::PaymentConfig;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaymentError {
    #[error("transaction rejected by user")]
    Rejected,
    #[error("no response from wallet")]
    TimedOut,
    #[error("transaction failed: {0}")]
    Failed(String),
}

impl PaymentError {
    /// Text for the failure toast.
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::Rejected => "Transaction rejected by user.".to_string(),
            PaymentError::TimedOut => {
                "No response from your wallet. Please try again.".to_string()
            }
            PaymentError::Failed(msg) if msg.is_empty() => {
                "Booster could not be activated.".to_string()
            }
            PaymentError::Failed(msg) => format!("Transaction failed: {}", msg),
        }
    }
}

/// Maps an error thrown by the wallet library onto our taxonomy.
pub fn classify_wallet_error(name: Option<&str>, message: Option<&str>) -> PaymentError {
    if name == Some("UserRejectsError") {
        return PaymentError::Rejected;
    }
    match message {
        Some(msg) if msg.to_lowercase().contains("reject") => PaymentError::Rejected,
        Some(msg) => PaymentError::Failed(msg.to_string()),
        None => PaymentError::Failed(String::new()),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMessage {
    pub address: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Unix seconds after which the wallet must refuse to send.
    pub valid_until: u64,
    pub messages: Vec<TransactionMessage>,
}

impl TransactionRequest {
    pub fn booster(cfg: &PaymentConfig, now_ms: u64) -> Self {
        Self {
            valid_until: now_ms / 1000 + cfg.valid_for_secs,
            messages: vec![TransactionMessage {
                address: cfg.recipient.clone(),
                amount: cfg.amount_nano.clone(),
                payload: cfg.payload.clone(),
            }],
        }
    }
}

/// Anything that can ask the user's wallet to send a transaction.
pub trait PaymentGateway {
    fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> LocalBoxFuture<'static, Result<(), PaymentError>>;
}

/// Waits for the payment, but no longer than `timeout`. The loser of the race is
/// dropped, so a gloo `TimeoutFuture` is cleared once the wallet answers and a
/// late wallet answer after a timeout is never observed.
pub async fn confirm_with_timeout<P, T>(payment: P, timeout: T) -> Result<(), PaymentError>
where
    P: Future<Output = Result<(), PaymentError>>,
    T: Future<Output = ()>,
{
    let payment = std::pin::pin!(payment);
    let timeout = std::pin::pin!(timeout);
    match future::select(payment, timeout).await {
        Either::Left((result, _timeout)) => result,
        Either::Right(((), _late_payment)) => Err(PaymentError::TimedOut),
    }
}
