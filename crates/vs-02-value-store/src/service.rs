//! # Value Store Binding
//!
//! Deploys the store and drives a deployed instance over any
//! [`LedgerConnection`].
//!
//! Handles hold addresses only; every operation borrows the connection, so
//! one resolved connection can serve the whole verification run.

use shared_types::{Address, Bytes, Hash, TransactionReceipt, TransactionRequest, U256};
use tracing::{info, instrument, warn};
use vs_01_ledger_client::{
    submit_transaction, wait_for_confirmation, ConfirmationPolicy, Identity, LedgerConnection,
};

use crate::artifact::ContractArtifact;
use crate::domain::codec::{self, StoreCall};
use crate::domain::entities::ValueStoreInstance;
use crate::errors::StoreError;
use crate::events::ChangeEvent;

// =============================================================================
// DEPLOYMENT
// =============================================================================

/// Builds and submits creation transactions for the store.
#[derive(Debug, Clone)]
pub struct ValueStoreFactory {
    bytecode: Bytes,
}

impl ValueStoreFactory {
    #[must_use]
    pub fn new(artifact: &ContractArtifact) -> Self {
        Self {
            bytecode: artifact.bytecode.clone(),
        }
    }

    #[must_use]
    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Submits the creation transaction from `deployer`, carrying `funding`.
    #[instrument(skip(self, connection), fields(deployer = %deployer.address()))]
    pub async fn deploy(
        &self,
        connection: &dyn LedgerConnection,
        deployer: &Identity,
        initial_name: &str,
        funding: U256,
    ) -> Result<PendingDeployment, StoreError> {
        let payload = codec::deployment_payload(self.bytecode.as_slice(), initial_name);
        let request = TransactionRequest::create(payload, funding);
        let tx_hash = submit_transaction(connection, deployer, request)
            .await
            .map_err(|e| StoreError::from_connection(e, deployer.address()))?;
        info!(tx = %tx_hash, "deployment submitted");
        Ok(PendingDeployment {
            tx_hash,
            deployer: deployer.address(),
            initial_name: initial_name.to_string(),
            funding,
        })
    }
}

/// A submitted, not yet confirmed, deployment.
#[derive(Debug, Clone)]
pub struct PendingDeployment {
    pub tx_hash: Hash,
    pub deployer: Address,
    pub initial_name: String,
    pub funding: U256,
}

impl PendingDeployment {
    /// Waits for the creation receipt under `policy`.
    pub async fn confirm(
        self,
        connection: &dyn LedgerConnection,
        policy: &ConfirmationPolicy,
    ) -> Result<Deployment, StoreError> {
        let receipt = wait_for_confirmation(connection, self.tx_hash, policy).await?;
        if !receipt.succeeded() {
            return Err(StoreError::TransactionFailed(self.tx_hash));
        }
        let address = receipt
            .contract_address
            .ok_or(StoreError::MissingContractAddress(self.tx_hash))?;
        info!(%address, block = receipt.block_number, "value store deployed");
        Ok(Deployment {
            contract: ValueStoreContract::at(address, *policy),
            receipt,
            initial_name: self.initial_name,
            funding: self.funding,
        })
    }
}

/// A confirmed deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub contract: ValueStoreContract,
    pub receipt: TransactionReceipt,
    pub initial_name: String,
    pub funding: U256,
}

// =============================================================================
// DEPLOYED INSTANCE
// =============================================================================

/// Handle to a deployed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueStoreContract {
    address: Address,
    policy: ConfirmationPolicy,
}

impl ValueStoreContract {
    /// Handle for the store at `address`; mutations wait under `policy`.
    #[must_use]
    pub fn at(address: Address, policy: ConfirmationPolicy) -> Self {
        Self { address, policy }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    async fn read(
        &self,
        connection: &dyn LedgerConnection,
        call: &StoreCall,
    ) -> Result<Bytes, StoreError> {
        let request = TransactionRequest::call(self.address, call.encode());
        connection
            .call(&request)
            .await
            .map_err(|e| StoreError::from_connection(e, Address::ZERO))
    }

    /// `getName()`.
    pub async fn get_name(&self, connection: &dyn LedgerConnection) -> Result<String, StoreError> {
        let data = self.read(connection, &StoreCall::GetName).await?;
        Ok(codec::decode_name(data.as_slice())?)
    }

    /// `owner()`.
    pub async fn owner(&self, connection: &dyn LedgerConnection) -> Result<Address, StoreError> {
        let data = self.read(connection, &StoreCall::Owner).await?;
        Ok(codec::decode_owner(data.as_slice())?)
    }

    /// Ledger balance held by the store.
    pub async fn balance(&self, connection: &dyn LedgerConnection) -> Result<U256, StoreError> {
        Ok(connection.get_balance(self.address).await?)
    }

    /// Address, owner, name and balance at the head block.
    pub async fn snapshot(
        &self,
        connection: &dyn LedgerConnection,
    ) -> Result<ValueStoreInstance, StoreError> {
        Ok(ValueStoreInstance {
            address: self.address,
            owner: self.owner(connection).await?,
            name: self.get_name(connection).await?,
            balance: self.balance(connection).await?,
        })
    }

    /// `changeName(newName)` as `caller`.
    ///
    /// The call is simulated first, so a rejection surfaces as
    /// [`StoreError::NotOwner`] without broadcasting anything. On success the
    /// confirmed receipt must carry exactly one `NameSet` event.
    #[instrument(skip(self, connection), fields(store = %self.address, caller = %caller.address()))]
    pub async fn change_name(
        &self,
        connection: &dyn LedgerConnection,
        caller: &Identity,
        new_name: &str,
    ) -> Result<ChangeEvent, StoreError> {
        let request = TransactionRequest::call(
            self.address,
            StoreCall::ChangeName(new_name.to_string()).encode(),
        )
        .with_from(caller.address());

        let rejected = |e| StoreError::from_connection(e, caller.address());
        connection.call(&request).await.map_err(rejected)?;
        let tx_hash = submit_transaction(connection, caller, request)
            .await
            .map_err(rejected)?;

        let receipt = wait_for_confirmation(connection, tx_hash, &self.policy).await?;
        if !receipt.succeeded() {
            return Err(StoreError::TransactionFailed(tx_hash));
        }

        let mut events = ChangeEvent::collect(&receipt.logs, self.address)?;
        if events.len() != 1 {
            warn!(tx = %tx_hash, count = events.len(), "unexpected NameSet event count");
            return Err(StoreError::UnexpectedEvents {
                tx_hash,
                count: events.len(),
            });
        }
        let event = events.remove(0);
        info!(tx = %tx_hash, new_name = %event.new_name, "name changed");
        Ok(event)
    }
}
