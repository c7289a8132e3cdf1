use thiserror::Error;

/// EIP-1193 code for a request the user (or wallet) refused.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-1193 code for a request the wallet has not authorised.
pub const UNAUTHORIZED_CODE: i64 = 4100;

/// Failure at the wallet-provider boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("no wallet provider detected")]
    NoWalletProvider,

    #[error("account authorisation rejected: {0}")]
    UserRejected(String),

    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// Failure of a single JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {0}")]
    Http(u16),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Whether the wallet refused the request on the user's behalf.
    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self,
            RpcError::Rpc { code, .. } if *code == USER_REJECTED_CODE || *code == UNAUTHORIZED_CODE
        )
    }
}

impl From<RpcError> for ConnectError {
    fn from(e: RpcError) -> Self {
        if e.is_user_rejection() {
            ConnectError::UserRejected(e.to_string())
        } else {
            ConnectError::Provider(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_codes_map_to_user_rejected() {
        let err = RpcError::Rpc {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".into(),
        };
        assert!(matches!(ConnectError::from(err), ConnectError::UserRejected(_)));
    }

    #[test]
    fn other_failures_map_to_provider_error() {
        let err = RpcError::Rpc {
            code: -32603,
            message: "internal error".into(),
        };
        assert!(matches!(ConnectError::from(err), ConnectError::Provider(_)));
        assert!(matches!(
            ConnectError::from(RpcError::Http(502)),
            ConnectError::Provider(_)
        ));
    }
}
