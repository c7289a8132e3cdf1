//! RankingProjector: derive the balance ranking from contract state.

use futures_util::future::try_join_all;
use thiserror::Error;
use tracing::Instrument;
use turing_contract::{ContractError, TokenContract};
use turing_types::{rank, Participant, RankingEntry};

use crate::tracing_spans::projection_span;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("roster read failed: {0}")]
    Roster(ContractError),

    #[error("lookup for {name:?} failed: {source}")]
    Lookup {
        name: String,
        source: ContractError,
    },
}

/// A complete, consistent read of roster and balances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Roster in contract order, with addresses resolved.
    pub roster: Vec<Participant>,
    /// Entries sorted by descending balance.
    pub ranking: Vec<RankingEntry>,
}

pub struct RankingProjector<'a, C: ?Sized> {
    contract: &'a C,
}

impl<'a, C: TokenContract + ?Sized> RankingProjector<'a, C> {
    pub fn new(contract: &'a C) -> Self {
        Self { contract }
    }

    /// Read the roster, then every participant's address and balance.
    ///
    /// Per-name lookups run concurrently; the result is produced only once
    /// all of them succeed. One failed lookup fails the whole projection.
    pub async fn project(&self) -> Result<Projection, ProjectionError> {
        self.read_all().instrument(projection_span()).await
    }

    async fn read_all(&self) -> Result<Projection, ProjectionError> {
        let names = self
            .contract
            .list_participant_names()
            .await
            .map_err(ProjectionError::Roster)?;

        tracing::debug!(participants = names.len(), "roster read, resolving balances");

        let rows = try_join_all(names.into_iter().map(|name| self.lookup(name))).await?;

        let (roster, entries): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        Ok(Projection {
            roster,
            ranking: rank(entries),
        })
    }

    async fn lookup(&self, name: String) -> Result<(Participant, RankingEntry), ProjectionError> {
        let fail = |source: ContractError| ProjectionError::Lookup {
            name: name.clone(),
            source,
        };
        let address = self
            .contract
            .resolve_participant_address(&name)
            .await
            .map_err(fail)?;
        let balance = self.contract.balance_of(address).await.map_err(fail)?;
        Ok((
            Participant::resolved(name.clone(), address),
            RankingEntry::new(name, balance),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_nullables::{ContractCall, NullContract};
    use turing_types::TokenAmount;

    fn names(projection: &Projection) -> Vec<&str> {
        projection.ranking.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn ranks_by_descending_balance() {
        let contract = NullContract::with_roster(&[("Alpha", 3), ("Beta", 12), ("Gamma", 7)]);
        let projection = RankingProjector::new(&contract).project().await.unwrap();
        assert_eq!(names(&projection), ["Beta", "Gamma", "Alpha"]);
        assert_eq!(projection.ranking[0].balance, TokenAmount::from_tokens(12));
        assert_eq!(projection.ranking[0].balance_display(), "12.0");
    }

    #[tokio::test]
    async fn equal_balances_keep_roster_order() {
        let contract = NullContract::with_roster(&[("Alpha", 10), ("Beta", 10)]);
        let projection = RankingProjector::new(&contract).project().await.unwrap();
        assert_eq!(names(&projection), ["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn roster_keeps_contract_order_with_addresses() {
        let contract = NullContract::with_roster(&[("Alpha", 1), ("Beta", 2)]);
        let projection = RankingProjector::new(&contract).project().await.unwrap();
        let roster: Vec<_> = projection.roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(roster, ["Alpha", "Beta"]);
        assert!(projection.roster.iter().all(|p| p.address.is_some()));
    }

    #[tokio::test]
    async fn empty_roster_projects_empty_ranking() {
        let contract = NullContract::new();
        let projection = RankingProjector::new(&contract).project().await.unwrap();
        assert!(projection.ranking.is_empty());
        assert_eq!(contract.calls(), vec![ContractCall::ListNames]);
    }

    #[tokio::test]
    async fn one_failed_lookup_fails_the_projection() {
        let contract = NullContract::with_roster(&[("Alpha", 1), ("Beta", 2), ("Gamma", 3)]);
        contract.fail_lookup("Beta");
        let err = RankingProjector::new(&contract).project().await.unwrap_err();
        assert!(matches!(err, ProjectionError::Lookup { ref name, .. } if name == "Beta"));
    }

    #[tokio::test]
    async fn roster_failure_is_reported() {
        let contract = NullContract::with_roster(&[("Alpha", 1)]);
        contract.fail_roster();
        let err = RankingProjector::new(&contract).project().await.unwrap_err();
        assert!(matches!(err, ProjectionError::Roster(_)));
    }
}
