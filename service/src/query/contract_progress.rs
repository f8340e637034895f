//! [`Query`] deriving the payment [`Progress`] of a [`Contract`].

use common::{
    operations::{By, Select},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, schedule, Contract, Payment},
    infra::{database, Database},
    read::Progress,
    Service,
};
#[cfg(doc)]
use crate::read::installment::DateDerived;

use super::Query;

/// [`Query`] deriving the payment [`Progress`] of a [`Contract`].
///
/// The breakdown is date-driven (see [`DateDerived`]): the stored status
/// fields of the installments are ignored.
#[derive(Clone, Copy, Debug)]
pub struct ContractProgress {
    /// ID of the [`Contract`] to derive the [`Progress`] of.
    pub contract_id: contract::Id,
}

impl<Db> Query<ContractProgress> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Progress;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ContractProgress { contract_id }: ContractProgress,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        _ = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let payments = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let progress = Progress::derive(&payments, Date::today());
        if !progress.is_complete() {
            log::warn!(
                contract_id = %contract_id,
                installments = progress.total_months,
                expected = schedule::TERM_MONTHS,
                "schedule completeness invariant violated",
            );
        }

        Ok(progress)
    }
}

/// Error of [`ContractProgress`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
