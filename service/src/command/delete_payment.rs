//! [`Command`] for deleting a [`Payment`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::{command::RepairSchedule, domain::Contract};

use super::Command;

/// [`Command`] for deleting a [`Payment`].
///
/// Deleting an installment leaves a hole in its [`Contract`]'s schedule;
/// [`RepairSchedule`] can fill it back in.
#[derive(Clone, Copy, Debug)]
pub struct DeletePayment {
    /// ID of the [`Payment`] to delete.
    pub id: payment::Id,
}

impl<Db> Command<DeletePayment> for Service<Db>
where
    Db: Database<
            Delete<By<Payment, payment::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeletePayment { id }: DeletePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let deleted = self
            .database()
            .execute(Delete(By::<Payment, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::PaymentNotExists(id)));
        }

        Ok(())
    }
}

/// Error of [`DeletePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Handler as _, Money,
    };
    use futures::executor::block_on;

    use super::{DeletePayment, ExecutionError};
    use crate::{
        domain::{payment, Payment},
        infra::InMem,
        Config, Service,
    };

    fn service() -> Service<InMem> {
        Service::new(Config::default(), InMem::new())
    }

    #[test]
    fn deletes_payment() {
        let s = service();
        let p = Payment::new(payment::NewPayment {
            tenant_id: None,
            property_id: None,
            contract_id: None,
            month_number: None,
            amount: Money::soles("500".parse().unwrap()),
            payment_date: None,
            due_date: "2099-12-31".parse().unwrap(),
            method: None,
            notes: None,
            today: "2026-05-20".parse().unwrap(),
        });
        let id = block_on(s.database().execute(Insert(p)))
            .unwrap()
            .id
            .unwrap();

        block_on(s.execute(DeletePayment { id })).unwrap();

        let stored = block_on(
            s.database()
                .execute(Select(By::<Option<Payment>, _>::new(id))),
        )
        .unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn errors_on_unknown_payment() {
        let s = service();

        let err = block_on(s.execute(DeletePayment {
            id: payment::Id::from(404),
        }))
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentNotExists(_),
        ));
    }
}
