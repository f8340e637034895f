//! In-memory [`Database`] implementation.
//!
//! Reference implementation of the persistence gateway the engine is built
//! against: a stateless, reentrant in-memory store assigning sequential
//! positive IDs, with staged [`Transact`]/[`Commit`] support. It doubles as
//! the test double for command and query tests, including a fault hook for
//! exercising mid-schedule persistence failures.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use common::operations::{By, Commit, Delete, Insert, Select, Transact, Update};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{contract, payment, Contract, Payment},
    infra::{database, Database},
};

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct InMem(Arc<Inner>);

/// Inner state of an [`InMem`] database.
#[derive(Debug, Default)]
struct Inner {
    /// Persisted [`Contract`]s, keyed by ID.
    contracts: Mutex<BTreeMap<contract::Id, Contract>>,

    /// Persisted [`Payment`]s, keyed by ID.
    payments: Mutex<BTreeMap<payment::Id, Payment>>,

    /// Source of [`contract::Id`]s.
    next_contract_id: AtomicI64,

    /// Source of [`payment::Id`]s.
    next_payment_id: AtomicI64,

    /// Number of [`Payment`] inserts remaining before injected failures
    /// kick in, if armed.
    payment_insert_faults: Mutex<Option<usize>>,
}

impl InMem {
    /// Creates a new empty [`InMem`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the fault hook: the next `successes` [`Payment`] inserts go
    /// through, and every one after them fails with [`Error::Injected`].
    ///
    /// Test instrumentation for exercising partial schedule generation.
    pub fn fail_payment_inserts_after(&self, successes: usize) {
        *lock(&self.0.payment_insert_faults) = Some(successes);
    }

    /// Consumes one slot of the fault hook, if armed.
    fn check_payment_insert_fault(&self) -> Result<(), Traced<database::Error>> {
        let mut faults = lock(&self.0.payment_insert_faults);
        if let Some(remaining) = faults.as_mut() {
            if *remaining == 0 {
                return Err(tracerr::new!(database::Error::from(
                    Error::Injected
                )));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    /// Stores the provided [`Payment`], assigning it a fresh ID if it has
    /// none.
    fn store_payment(&self, mut payment: Payment) -> Payment {
        let id = payment.id.unwrap_or_else(|| {
            (self.0.next_payment_id.fetch_add(1, Ordering::Relaxed) + 1)
                .into()
        });
        payment.id = Some(id);
        _ = lock(&self.0.payments).insert(id, payment.clone());
        payment
    }
}

/// Locks the provided [`Mutex`], ignoring poisoning.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Error of an [`InMem`] database operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Contract`] to update does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractMissing(#[error(not(source))] contract::Id),

    /// [`Payment`] to update does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentMissing(#[error(not(source))] payment::Id),

    /// Row to update has no ID, i.e. was never saved.
    #[display("cannot update an unsaved row")]
    Unsaved,

    /// Failure injected by [`InMem::fail_payment_inserts_after()`].
    #[display("injected `Database` failure")]
    Injected,
}

impl Database<Insert<Contract>> for InMem {
    type Ok = Contract;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = contract.id.unwrap_or_else(|| {
            (self.0.next_contract_id.fetch_add(1, Ordering::Relaxed) + 1)
                .into()
        });
        contract.id = Some(id);
        _ = lock(&self.0.contracts).insert(id, contract.clone());
        Ok(contract)
    }
}

impl Database<Insert<Payment>> for InMem {
    type Ok = Payment;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check_payment_insert_fault()?;
        Ok(self.store_payment(payment))
    }
}

impl Database<Update<Contract>> for InMem {
    type Ok = Contract;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = contract.id.ok_or_else(|| {
            tracerr::new!(database::Error::from(Error::Unsaved))
        })?;
        let mut contracts = lock(&self.0.contracts);
        if !contracts.contains_key(&id) {
            return Err(tracerr::new!(database::Error::from(
                Error::ContractMissing(id)
            )));
        }
        _ = contracts.insert(id, contract.clone());
        Ok(contract)
    }
}

impl Database<Update<Payment>> for InMem {
    type Ok = Payment;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = payment.id.ok_or_else(|| {
            tracerr::new!(database::Error::from(Error::Unsaved))
        })?;
        let mut payments = lock(&self.0.payments);
        if !payments.contains_key(&id) {
            return Err(tracerr::new!(database::Error::from(
                Error::PaymentMissing(id)
            )));
        }
        _ = payments.insert(id, payment.clone());
        Ok(payment)
    }
}

impl Database<Select<By<Option<Contract>, contract::Id>>> for InMem {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(lock(&self.0.contracts).get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Option<Payment>, payment::Id>>> for InMem {
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(lock(&self.0.payments).get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Payment>, contract::Id>>> for InMem {
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(lock(&self.0.payments)
            .values()
            .filter(|p| contract::owns(id, p))
            .cloned()
            .collect())
    }
}

impl Database<Delete<By<Contract, contract::Id>>> for InMem {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(lock(&self.0.contracts).remove(&by.into_inner()).is_some())
    }
}

impl Database<Delete<By<Payment, payment::Id>>> for InMem {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(lock(&self.0.payments).remove(&by.into_inner()).is_some())
    }
}

impl Database<Transact> for InMem {
    type Ok = Transaction;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Transaction {
            db: self.clone(),
            staged: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

/// Open [`InMem`] transaction.
///
/// Writes are staged and only become visible on [`Commit`]; dropping the
/// [`Transaction`] without committing discards them.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// [`InMem`] database this [`Transaction`] belongs to.
    db: InMem,

    /// [`Payment`]s staged for [`Commit`].
    staged: Arc<Mutex<Vec<Payment>>>,
}

impl Database<Insert<Payment>> for Transaction {
    type Ok = Payment;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.db.check_payment_insert_fault()?;
        // IDs come from a sequence, so one assigned to a staged row is
        // never reused even if the transaction is dropped.
        let id = payment.id.unwrap_or_else(|| {
            (self.db.0.next_payment_id.fetch_add(1, Ordering::Relaxed) + 1)
                .into()
        });
        payment.id = Some(id);
        lock(&self.staged).push(payment.clone());
        Ok(payment)
    }
}

impl Database<Commit> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let staged = lock(&self.staged).split_off(0);
        let mut payments = lock(&self.db.0.payments);
        for payment in staged {
            let id = payment.id.expect("assigned on staging");
            _ = payments.insert(id, payment);
        }
        Ok(())
    }
}
