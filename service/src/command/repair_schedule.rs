//! [`Command`] for completing the payment schedule of a [`Contract`].

use common::{
    operations::{By, Insert, Select},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, payment, schedule, Contract, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for completing the payment schedule of a [`Contract`].
///
/// Inserts an installment for every month of the schedule that has none,
/// built from the contract's current terms (so a repaired installment
/// carries today's rent, not the rent at creation time). Idempotent: a
/// complete schedule is left untouched.
#[derive(Clone, Copy, Debug)]
pub struct RepairSchedule {
    /// ID of the [`Contract`] whose schedule should be completed.
    pub contract_id: contract::Id,
}

impl<Db> Command<RepairSchedule> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>,
{
    type Ok = Vec<Payment>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RepairSchedule { contract_id }: RepairSchedule,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let existing = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let missing = schedule::missing_months(&existing);

        let plan = payment::MonthNumber::all()
            .zip(schedule::installments(&contract, Date::today()))
            .filter(|(month, _)| missing.contains(month));
        let mut inserted = Vec::with_capacity(missing.len());
        for (month, payment) in plan {
            match self.database().execute(Insert(payment)).await {
                Ok(p) => inserted.push(p),
                Err(e) => {
                    let (source, trace) = e.split();
                    return Err(Traced::compose(
                        E::Schedule { month, source },
                        trace,
                    ));
                }
            }
        }

        Ok(inserted)
    }
}

/// Error of [`RepairSchedule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Repaired installment failed to persist.
    #[display(
        "installment #{month} of the schedule failed to persist: {source}"
    )]
    Schedule {
        /// Position of the failed installment within the schedule.
        month: payment::MonthNumber,

        /// [`Database`] error the installment write failed with.
        source: database::Error,
    },
}
