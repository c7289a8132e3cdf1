//! [`TokenContract`] over an Ethereum JSON-RPC endpoint.

use alloy_primitives::Bytes;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use turing_types::{Address, TokenAmount, TxHash};
use turing_wallet::rpc::parse_quantity;
use turing_wallet::{JsonRpcTransport, RpcError, SignerContext};

use crate::abi;
use crate::binding::{PendingTx, TokenContract, TxReceipt, WriteCall};
use crate::error::ContractError;

/// Default interval between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Consecutive failed receipt polls tolerated before giving up.
const MAX_POLL_FAILURES: u32 = 5;

/// The contract at `address`, sending writes from the signer's account.
#[derive(Clone)]
pub struct JsonRpcContract {
    transport: JsonRpcTransport,
    address: Address,
    signer: SignerContext,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl JsonRpcContract {
    pub fn new(transport: JsonRpcTransport, address: Address, signer: SignerContext) -> Self {
        Self {
            transport,
            address,
            signer,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &SignerContext {
        &self.signer
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return, ContractError> {
        let params = serde_json::json!([
            {
                "from": self.signer.account.address(),
                "to": self.address,
                "data": Bytes::from(call.abi_encode()),
            },
            "latest"
        ]);
        let output: Bytes = self.transport.request("eth_call", params).await?;
        C::abi_decode_returns(&output, true)
            .map_err(|e| ContractError::Decode(format!("{}: {e}", C::SIGNATURE)))
    }

    async fn send<C: SolCall>(&self, call: C, write: WriteCall) -> Result<PendingTx, ContractError> {
        let params = serde_json::json!([{
            "from": self.signer.account.address(),
            "to": self.address,
            "data": Bytes::from(call.abi_encode()),
        }]);
        let hash: TxHash = self
            .transport
            .request("eth_sendTransaction", params)
            .await
            .map_err(ContractError::from_submission)?;
        tracing::debug!(tx = %hash, call = %write, "transaction submitted");
        Ok(PendingTx { hash, call: write })
    }

    async fn poll_receipt(&self, hash: TxHash) -> Result<Option<RawReceipt>, RpcError> {
        self.transport
            .request("eth_getTransactionReceipt", serde_json::json!([hash]))
            .await
    }
}

/// Turn a mined receipt into a success or a revert.
fn settle(receipt: RawReceipt) -> Result<Option<TxReceipt>, ContractError> {
    let Some(block) = receipt.block_number else {
        return Ok(None);
    };
    let block_number = parse_quantity(&block)?;
    match receipt.status.as_deref() {
        Some("0x0") => Err(ContractError::Reverted(receipt.transaction_hash)),
        _ => Ok(Some(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number,
        })),
    }
}

#[async_trait]
impl TokenContract for JsonRpcContract {
    async fn list_participant_names(&self) -> Result<Vec<String>, ContractError> {
        Ok(self.call(abi::getCodinomesCall {}).await?._0)
    }

    async fn resolve_participant_address(&self, name: &str) -> Result<Address, ContractError> {
        let call = abi::codinomesCall {
            name: name.to_string(),
        };
        Ok(self.call(call).await?._0)
    }

    async fn balance_of(&self, address: Address) -> Result<TokenAmount, ContractError> {
        let call = abi::balanceOfCall { account: address };
        Ok(TokenAmount::from_base_units(self.call(call).await?._0))
    }

    async fn issue_tokens(
        &self,
        name: &str,
        amount: TokenAmount,
    ) -> Result<PendingTx, ContractError> {
        let call = abi::issueTokenCall {
            codinome: name.to_string(),
            amount: amount.base_units(),
        };
        let write = WriteCall::IssueToken {
            name: name.to_string(),
            amount,
        };
        self.send(call, write).await
    }

    async fn cast_vote(
        &self,
        name: &str,
        amount: TokenAmount,
    ) -> Result<PendingTx, ContractError> {
        let call = abi::voteCall {
            codinome: name.to_string(),
            amount: amount.base_units(),
        };
        let write = WriteCall::Vote {
            name: name.to_string(),
            amount,
        };
        self.send(call, write).await
    }

    async fn enable_voting(&self) -> Result<PendingTx, ContractError> {
        self.send(abi::votingOnCall {}, WriteCall::VotingOn).await
    }

    async fn disable_voting(&self) -> Result<PendingTx, ContractError> {
        self.send(abi::votingOffCall {}, WriteCall::VotingOff).await
    }

    async fn wait_for_confirmation(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError> {
        let mut failures = 0;
        loop {
            match self.poll_receipt(tx.hash).await {
                Ok(Some(raw)) => {
                    if let Some(receipt) = settle(raw)? {
                        return Ok(receipt);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    failures += 1;
                    tracing::warn!(tx = %tx.hash, error = %e, failures, "receipt poll failed");
                    if failures >= MAX_POLL_FAILURES {
                        return Err(ContractError::Rpc(e));
                    }
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
            }
            failures = 0;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawReceipt {
        serde_json::from_value(json).unwrap()
    }

    const HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

    #[test]
    fn successful_receipt_settles() {
        let receipt = settle(raw(serde_json::json!({
            "transactionHash": HASH,
            "blockNumber": "0x10",
            "status": "0x1"
        })))
        .unwrap()
        .unwrap();
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.tx_hash, HASH.parse::<TxHash>().unwrap());
    }

    #[test]
    fn reverted_receipt_is_an_error() {
        let err = settle(raw(serde_json::json!({
            "transactionHash": HASH,
            "blockNumber": "0x10",
            "status": "0x0"
        })))
        .unwrap_err();
        assert!(matches!(err, ContractError::Reverted(_)));
    }

    #[test]
    fn unmined_receipt_keeps_waiting() {
        let pending = settle(raw(serde_json::json!({
            "transactionHash": HASH,
            "blockNumber": null
        })))
        .unwrap();
        assert!(pending.is_none());
    }

    #[test]
    fn calldata_matches_the_contract_abi() {
        let call = abi::issueTokenCall {
            codinome: "Alpha".into(),
            amount: TokenAmount::from_tokens(1).base_units(),
        };
        let data = call.abi_encode();
        assert_eq!(&data[..4], &abi::issueTokenCall::SELECTOR);
        // selector + string offset + amount + length + one padded word
        assert_eq!(data.len(), 4 + 32 * 4);

        let decoded = abi::issueTokenCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.codinome, "Alpha");
    }

    #[test]
    fn binding_keeps_address_and_signer() {
        let transport =
            JsonRpcTransport::new("http://127.0.0.1:8545", Duration::from_secs(5)).unwrap();
        let signer = SignerContext {
            account: turing_types::Account::new(Address::with_last_byte(7)),
            chain_id: 31337,
        };
        let contract = JsonRpcContract::new(transport, crate::DEFAULT_CONTRACT_ADDRESS, signer)
            .with_poll_interval(Duration::from_millis(10));
        assert_eq!(contract.address(), crate::DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(contract.signer(), &signer);
    }

    #[test]
    fn roster_return_decodes() {
        let names = vec!["Alpha".to_string(), "Beta".to_string()];
        let encoded = abi::getCodinomesCall::abi_encode_returns(&(names.clone(),));
        let decoded = abi::getCodinomesCall::abi_decode_returns(&encoded, true).unwrap();
        assert_eq!(decoded._0, names);
    }
}
