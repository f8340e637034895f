//! [`Command`] for deleting a [`Contract`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Contract`].
///
/// Refused while any [`Payment`] still references the [`Contract`]: payment
/// history is never cascaded away, the installments have to be removed
/// explicitly first.
#[derive(Clone, Copy, Debug)]
pub struct DeleteContract {
    /// ID of the [`Contract`] to delete.
    pub id: contract::Id,
}

impl<Db> Command<DeleteContract> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Contract, contract::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteContract { id }: DeleteContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let payments = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !payments.is_empty() {
            return Err(tracerr::new!(E::HasPayments(id)));
        }

        let deleted = self
            .database()
            .execute(Delete(By::<Contract, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::ContractNotExists(id)));
        }

        Ok(())
    }
}

/// Error of [`DeleteContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] still has [`Payment`]s referencing it.
    #[display("Cannot delete contract with associated payments")]
    HasPayments(#[error(not(source))] contract::Id),
}
