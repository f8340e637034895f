//! [`Query`] building the display timeline of a [`Contract`]'s year.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract, Payment},
    infra::{database, Database},
    read::{timeline, MonthSlot},
    Service,
};
#[cfg(doc)]
use crate::read::installment::StoredField;

use super::Query;

/// [`Query`] building the twelve-slot display timeline of a [`Contract`]'s
/// year.
///
/// Slots are classified via [`StoredField`] only: the installments' stored
/// status fields are trusted as-is, and no dates are compared.
#[derive(Clone, Copy, Debug)]
pub struct ContractTimeline {
    /// ID of the [`Contract`] to build the timeline of.
    pub contract_id: contract::Id,

    /// Year the timeline is scoped to.
    pub year: i32,
}

impl<Db> Query<ContractTimeline> for Service<Db>
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
    type Ok = Vec<MonthSlot>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ContractTimeline { contract_id, year }: ContractTimeline,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        _ = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let payments: Vec<_> = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|p| p.due_date.year() == year)
            .collect();

        Ok(timeline::build(year, &payments))
    }
}

/// Error of [`ContractTimeline`] [`Query`] execution.
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

#[cfg(test)]
mod spec {
    use common::{
        operations::{Insert, Update},
        Handler as _, Money,
    };
    use futures::executor::block_on;

    use super::{ContractTimeline, ExecutionError};
    use crate::{
        domain::{
            contract, payment, property, schedule, tenant, Contract,
        },
        infra::InMem,
        query::payments,
        read::installment::Status,
        Config, Service,
    };

    fn service() -> Service<InMem> {
        Service::new(Config::default(), InMem::new())
    }

    fn with_schedule(s: &Service<InMem>) -> contract::Id {
        let c = Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            "2026-01-01".parse().unwrap(),
            Money::soles("1200".parse().unwrap()),
            None,
        );
        let c = block_on(s.database().execute(Insert(c))).unwrap();
        for p in schedule::installments(&c, "2026-01-01".parse().unwrap()) {
            _ = block_on(s.database().execute(Insert(p))).unwrap();
        }
        c.id.unwrap()
    }

    #[test]
    fn renders_the_stored_statuses_of_the_requested_year() {
        let s = service();
        let id = with_schedule(&s);
        let mut first =
            block_on(s.execute(payments::ByContract::by(id)))
                .unwrap()
                .into_iter()
                .next()
                .unwrap();
        first.status = Some(payment::Status::Paid);
        _ = block_on(s.database().execute(Update(first))).unwrap();

        let timeline = block_on(s.execute(ContractTimeline {
            contract_id: id,
            year: 2026,
        }))
        .unwrap();

        assert_eq!(timeline.len(), 12);
        assert_eq!(timeline[0].status, Status::Paid);
        assert_eq!(timeline[0].label, "Ene 2026");
        assert!(timeline[1..].iter().all(|slot| slot.status == Status::Due));
    }

    #[test]
    fn ignores_installments_due_outside_the_requested_year() {
        let s = service();
        let id = with_schedule(&s);

        let timeline = block_on(s.execute(ContractTimeline {
            contract_id: id,
            year: 2027,
        }))
        .unwrap();

        assert_eq!(timeline.len(), 12);
        assert!(timeline.iter().all(|slot| slot.status == Status::Due));
        assert_eq!(
            timeline[0].due_date,
            "2027-01-01".parse().unwrap(),
        );
    }

    #[test]
    fn errors_on_unknown_contract() {
        let s = service();

        let err = block_on(s.execute(ContractTimeline {
            contract_id: contract::Id::from(404),
            year: 2026,
        }))
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(_),
        ));
    }
}
