//! Error types for the drop page service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Service error type. A slug with no matching collection is not an error;
/// the content interface reports it as an absent record.
#[derive(Debug)]
pub enum Error {
    /// Content API communication or query error.
    Content(String),
    /// Chain RPC communication error.
    Rpc(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Content(msg) => write!(f, "content error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Content(_) => StatusCode::BAD_GATEWAY,
            Error::Rpc(_) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}

/// Why a mint attempt failed.
///
/// Provider failures arrive as strings at the JSON-RPC boundary;
/// [`MintError::classify`] sorts them into variants so each cause gets its
/// own user-facing message instead of one catch-all toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    /// The wallet refused to sign the transaction.
    Rejected,
    /// The connected account cannot cover price plus gas.
    InsufficientFunds,
    /// The claim transaction reverted on-chain.
    Reverted(String),
    /// Transport or provider failure before/after submission.
    Network(String),
}

impl MintError {
    /// Sort a raw provider error message into a taxonomy variant.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("insufficient funds") {
            MintError::InsufficientFunds
        } else if lower.contains("rejected") || lower.contains("denied") {
            MintError::Rejected
        } else if lower.contains("revert") {
            MintError::Reverted(message.to_string())
        } else {
            MintError::Network(message.to_string())
        }
    }

    /// Message shown in the failure notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            MintError::Rejected => "Whoops... the wallet rejected the transaction.",
            MintError::InsufficientFunds => {
                "Whoops... that wallet can't cover the mint price plus gas."
            }
            MintError::Reverted(_) => "Whoops... the contract refused the claim.",
            MintError::Network(_) => "Whoops... something went wrong, please try again.",
        }
    }
}

impl fmt::Display for MintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintError::Rejected => write!(f, "wallet rejected the transaction"),
            MintError::InsufficientFunds => write!(f, "insufficient funds"),
            MintError::Reverted(msg) => write!(f, "claim reverted: {msg}"),
            MintError::Network(msg) => write!(f, "network error: {msg}"),
        }
    }
}

impl std::error::Error for MintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insufficient_funds() {
        let err = MintError::classify("insufficient funds for gas * price + value");
        assert_eq!(err, MintError::InsufficientFunds);
    }

    #[test]
    fn test_classify_user_rejection() {
        assert_eq!(
            MintError::classify("MetaMask Tx Signature: User denied transaction signature."),
            MintError::Rejected
        );
        assert_eq!(
            MintError::classify("request rejected by wallet"),
            MintError::Rejected
        );
    }

    #[test]
    fn test_classify_revert() {
        let err = MintError::classify("execution reverted: !Qty");
        assert!(matches!(err, MintError::Reverted(_)));
    }

    #[test]
    fn test_classify_fallback_is_network() {
        let err = MintError::classify("connection reset by peer");
        assert!(matches!(err, MintError::Network(_)));
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let msgs = [
            MintError::Rejected.user_message(),
            MintError::InsufficientFunds.user_message(),
            MintError::Reverted(String::new()).user_message(),
            MintError::Network(String::new()).user_message(),
        ];
        for (i, a) in msgs.iter().enumerate() {
            for b in msgs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
