//! [`Command`] for creating a new [`Contract`] along with its payment
//! schedule.

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, payment, property, schedule, tenant, Contract, Payment},
    infra::{database, Database},
    Generation, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`] along with its twelve-month
/// payment schedule.
#[derive(Clone, Copy, Debug)]
pub struct CreateContract {
    /// ID of the tenant renting the property.
    pub tenant_id: tenant::Id,

    /// ID of the rented property.
    pub property_id: property::Id,

    /// First day of the lease term.
    pub start_date: Date,

    /// Last day of the lease term.
    ///
    /// Defaults to `start_date + 1 year` when omitted.
    pub end_date: Option<Date>,

    /// Monthly rent amount.
    pub monthly_rent: Money,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<
            Insert<Contract>,
            Ok = Contract,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>
        + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Payment>,
            Ok = Payment,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            tenant_id,
            property_id,
            start_date,
            end_date,
            monthly_rent,
        } = cmd;

        let contract = Contract::new(
            tenant_id,
            property_id,
            start_date,
            monthly_rent,
            end_date,
        );
        // Validated before anything touches the `Database`: an invalid
        // `Contract` must leave no rows behind.
        contract.validate().map_err(tracerr::from_and_wrap!(=> E))?;

        let contract = self
            .database()
            .execute(Insert(contract))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let plan = schedule::installments(&contract, Date::today());
        match self.config().generation {
            Generation::Independent => {
                for (month, payment) in payment::MonthNumber::all().zip(plan) {
                    if let Err(e) =
                        self.database().execute(Insert(payment)).await
                    {
                        let (source, trace) = e.split();
                        return Err(Traced::compose(
                            E::Schedule { month, source },
                            trace,
                        ));
                    }
                }
            }
            Generation::Atomic => {
                let tx = self
                    .database()
                    .execute(Transact)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                for (month, payment) in payment::MonthNumber::all().zip(plan) {
                    if let Err(e) = tx.execute(Insert(payment)).await {
                        let (source, trace) = e.split();
                        return Err(Traced::compose(
                            E::Schedule { month, source },
                            trace,
                        ));
                    }
                }
                tx.execute(Commit)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Installment of the generated schedule failed to persist.
    ///
    /// Under [`Generation::Independent`] the preceding installments stay
    /// persisted; under [`Generation::Atomic`] none of them do.
    #[display(
        "installment #{month} of the schedule failed to persist: {source}"
    )]
    Schedule {
        /// Position of the failed installment within the schedule.
        month: payment::MonthNumber,

        /// [`Database`] error the installment write failed with.
        source: database::Error,
    },

    /// New [`Contract`] is not valid.
    #[display("invalid `Contract`: {_0}")]
    #[from]
    Validation(contract::ValidationError),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Handler as _, Money,
    };
    use futures::executor::block_on;

    use super::{CreateContract, ExecutionError};
    use crate::{
        domain::{contract, property, tenant, Contract, Payment},
        infra::InMem,
        Config, Generation, Service,
    };

    fn service(generation: Generation) -> Service<InMem> {
        Service::new(
            Config {
                generation,
                ..Config::default()
            },
            InMem::new(),
        )
    }

    fn cmd(start: &str, rent: &str) -> CreateContract {
        CreateContract {
            tenant_id: tenant::Id::from(1),
            property_id: property::Id::from(2),
            start_date: start.parse().unwrap(),
            end_date: None,
            monthly_rent: Money::soles(rent.parse().unwrap()),
        }
    }

    fn payments_of(s: &Service<InMem>, id: contract::Id) -> Vec<Payment> {
        block_on(
            s.database().execute(Select(By::<Vec<Payment>, _>::new(id))),
        )
        .unwrap()
    }

    #[test]
    fn persists_contract_and_twelve_installments() {
        let s = service(Generation::Independent);

        let contract = block_on(s.execute(cmd("2026-01-31", "1200"))).unwrap();
        let id = contract.id.unwrap();

        let stored = block_on(
            s.database()
                .execute(Select(By::<Option<Contract>, _>::new(id))),
        )
        .unwrap();
        assert!(stored.is_some());

        let payments = payments_of(&s, id);
        assert_eq!(payments.len(), 12);
        let months: Vec<_> = payments
            .iter()
            .map(|p| p.month_number.unwrap().get())
            .collect();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
        assert!(payments.iter().all(|p| p.id.is_some()));
        assert!(payments.iter().all(|p| p.amount == contract.monthly_rent));
        assert_eq!(payments[0].due_date.to_string(), "2026-01-31");
        assert_eq!(payments[1].due_date.to_string(), "2026-02-28");
    }

    #[test]
    fn rejects_invalid_contract_before_persisting_anything() {
        let s = service(Generation::Independent);

        let err = block_on(s.execute(cmd("2026-01-01", "0"))).unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));

        let stored = block_on(s.database().execute(Select(By::<
            Option<Contract>,
            _,
        >::new(
            contract::Id::from(1)
        ))))
        .unwrap();
        assert!(stored.is_none());
        assert!(payments_of(&s, contract::Id::from(1)).is_empty());
    }

    #[test]
    fn independent_generation_keeps_prefix_on_mid_schedule_failure() {
        let s = service(Generation::Independent);
        s.database().fail_payment_inserts_after(4);

        let err = block_on(s.execute(cmd("2026-01-01", "1200"))).unwrap_err();
        let ExecutionError::Schedule { month, .. } = err.as_ref() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(month.get(), 5);

        let payments = payments_of(&s, contract::Id::from(1));
        let months: Vec<_> = payments
            .iter()
            .map(|p| p.month_number.unwrap().get())
            .collect();
        assert_eq!(months, vec![1, 2, 3, 4]);
    }

    #[test]
    fn atomic_generation_persists_nothing_on_mid_schedule_failure() {
        let s = service(Generation::Atomic);
        s.database().fail_payment_inserts_after(4);

        let err = block_on(s.execute(cmd("2026-01-01", "1200"))).unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Schedule { .. }));

        assert!(payments_of(&s, contract::Id::from(1)).is_empty());
    }

    #[test]
    fn atomic_generation_persists_whole_schedule_on_success() {
        let s = service(Generation::Atomic);

        let contract = block_on(s.execute(cmd("2026-03-10", "800"))).unwrap();

        assert_eq!(payments_of(&s, contract.id.unwrap()).len(), 12);
    }
}
