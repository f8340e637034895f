//! [`Command`] for recording a new [`Payment`].

use common::{
    operations::{By, Insert, Select},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, payment, property, tenant, Contract, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Payment`], either a standalone one or
/// an extra installment attached to an existing [`Contract`].
#[derive(Clone, Debug)]
pub struct CreatePayment {
    /// ID of the paying tenant, if known.
    pub tenant_id: Option<tenant::Id>,

    /// ID of the property the payment is for, if known.
    pub property_id: Option<property::Id>,

    /// ID of the [`Contract`] the payment belongs to, if any.
    ///
    /// Must reference an existing [`Contract`] when provided.
    pub contract_id: Option<contract::Id>,

    /// Position within the owning [`Contract`]'s schedule.
    ///
    /// Required whenever [`CreatePayment::contract_id`] is provided.
    pub month_number: Option<payment::MonthNumber>,

    /// Amount of the [`Payment`].
    pub amount: Money,

    /// [`Date`] the payment was made. Defaults to today.
    pub payment_date: Option<Date>,

    /// [`Date`] the payment is owed.
    pub due_date: Date,

    /// Channel of the [`Payment`]. Defaults to [`payment::Method::Yape`].
    pub method: Option<payment::Method>,

    /// Free-text notes.
    pub notes: Option<payment::Notes>,
}

impl<Db> Command<CreatePayment> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePayment {
            tenant_id,
            property_id,
            contract_id,
            month_number,
            amount,
            payment_date,
            due_date,
            method,
            notes,
        } = cmd;

        if let Some(contract_id) = contract_id {
            _ = self
                .database()
                .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ContractNotExists(contract_id))
                .map_err(tracerr::wrap!())?;
        }

        let payment = Payment::new(payment::NewPayment {
            tenant_id,
            property_id,
            contract_id,
            month_number,
            amount,
            payment_date,
            due_date,
            method,
            notes,
            today: Date::today(),
        });
        payment.validate().map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Insert(payment))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreatePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// New [`Payment`] is not valid.
    #[display("invalid `Payment`: {_0}")]
    #[from]
    Validation(payment::ValidationError),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Handler as _, Money};
    use futures::executor::block_on;

    use super::{CreatePayment, ExecutionError};
    use crate::{
        domain::{contract, payment, property, tenant, Contract},
        infra::InMem,
        Config, Service,
    };

    fn service() -> Service<InMem> {
        Service::new(Config::default(), InMem::new())
    }

    fn cmd(amount: &str) -> CreatePayment {
        CreatePayment {
            tenant_id: Some(tenant::Id::from(1)),
            property_id: Some(property::Id::from(2)),
            contract_id: None,
            month_number: None,
            amount: Money::soles(amount.parse().unwrap()),
            payment_date: None,
            due_date: "2099-12-31".parse().unwrap(),
            method: None,
            notes: None,
        }
    }

    #[test]
    fn records_standalone_payment_with_defaults() {
        let s = service();

        let p = block_on(s.execute(CreatePayment {
            notes: Some("Pago adelantado".parse().unwrap()),
            ..cmd("350")
        }))
        .unwrap();

        assert!(p.id.is_some());
        assert_eq!(p.method, payment::Method::Yape);
        assert_eq!(p.payment_date, common::Date::today());
        assert_eq!(p.status, None);
        assert_eq!(p.notes, Some("Pago adelantado".parse().unwrap()));
    }

    #[test]
    fn attaches_payment_to_existing_contract() {
        let s = service();
        let c = Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            "2026-01-01".parse().unwrap(),
            Money::soles("1200".parse().unwrap()),
            None,
        );
        let c = block_on(s.database().execute(Insert(c))).unwrap();

        let p = block_on(s.execute(CreatePayment {
            contract_id: c.id,
            month_number: payment::MonthNumber::new(1),
            ..cmd("1200")
        }))
        .unwrap();

        assert_eq!(p.contract_id, c.id);
    }

    #[test]
    fn rejects_unknown_contract() {
        let s = service();

        let err = block_on(s.execute(CreatePayment {
            contract_id: Some(contract::Id::from(404)),
            month_number: payment::MonthNumber::new(1),
            ..cmd("1200")
        }))
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(_),
        ));
    }

    #[test]
    fn rejects_invalid_payment() {
        let s = service();

        let err = block_on(s.execute(cmd("0"))).unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));
    }
}
