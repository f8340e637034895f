//! [`Command`] for updating an existing [`Payment`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Payment`].
///
/// This is the only way a stored [`payment::Status`] ever changes: nothing
/// recomputes it from dates behind the caller's back.
#[derive(Clone, Debug)]
pub struct UpdatePayment {
    /// ID of the [`Payment`] to update.
    pub id: payment::Id,

    /// [`payment::Patch`] to apply.
    pub patch: payment::Patch,
}

impl<Db> Command<UpdatePayment> for Service<Db>
where
    Db: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<Update<Payment>, Ok = Payment, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        UpdatePayment { id, patch }: UpdatePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut payment = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(id))
            .map_err(tracerr::wrap!())?;

        payment.apply(patch).map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Update(payment))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`UpdatePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),

    /// Patched [`Payment`] is not valid.
    #[display("invalid `Payment`: {_0}")]
    #[from]
    Validation(payment::ValidationError),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Handler as _, Money,
    };
    use futures::executor::block_on;

    use super::{ExecutionError, UpdatePayment};
    use crate::{
        domain::{payment, Payment},
        infra::InMem,
        Config, Service,
    };

    fn service() -> Service<InMem> {
        Service::new(Config::default(), InMem::new())
    }

    fn persisted(s: &Service<InMem>) -> Payment {
        let p = Payment::new(payment::NewPayment {
            tenant_id: None,
            property_id: None,
            contract_id: None,
            month_number: None,
            amount: Money::soles("1200".parse().unwrap()),
            payment_date: Some("2026-05-20".parse().unwrap()),
            due_date: "2026-06-01".parse().unwrap(),
            method: None,
            notes: None,
            today: "2026-05-20".parse().unwrap(),
        });
        block_on(s.database().execute(Insert(p))).unwrap()
    }

    #[test]
    fn marks_payment_paid() {
        let s = service();
        let id = persisted(&s).id.unwrap();

        let updated = block_on(s.execute(UpdatePayment {
            id,
            patch: payment::Patch {
                status: Some(Some(payment::Status::Paid)),
                ..payment::Patch::default()
            },
        }))
        .unwrap();
        assert_eq!(updated.status, Some(payment::Status::Paid));

        let stored = block_on(
            s.database()
                .execute(Select(By::<Option<Payment>, _>::new(id))),
        )
        .unwrap()
        .unwrap();
        assert_eq!(stored.status, Some(payment::Status::Paid));
    }

    #[test]
    fn rejects_edit_marking_payment_late() {
        let s = service();
        let id = persisted(&s).id.unwrap();

        let err = block_on(s.execute(UpdatePayment {
            id,
            patch: payment::Patch {
                payment_date: Some("2026-06-02".parse().unwrap()),
                ..payment::Patch::default()
            },
        }))
        .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));

        let stored = block_on(
            s.database()
                .execute(Select(By::<Option<Payment>, _>::new(id))),
        )
        .unwrap()
        .unwrap();
        assert_eq!(stored.payment_date, "2026-05-20".parse().unwrap());
    }

    #[test]
    fn errors_on_unknown_payment() {
        let s = service();

        let err = block_on(s.execute(UpdatePayment {
            id: payment::Id::from(404),
            patch: payment::Patch::default(),
        }))
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentNotExists(_),
        ));
    }
}
