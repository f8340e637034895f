//! [`Command`] for updating an existing [`Contract`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::{domain::Payment, Config};

use super::Command;

/// [`Command`] for updating an existing [`Contract`].
///
/// Already generated [`Payment`]s are never touched: a rent edit only affects
/// installments generated afterwards.
#[derive(Clone, Debug)]
pub struct UpdateContract {
    /// ID of the [`Contract`] to update.
    pub id: contract::Id,

    /// [`contract::Patch`] to apply.
    pub patch: contract::Patch,
}

impl<Db> Command<UpdateContract> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Update<Contract>,
            Ok = Contract,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        UpdateContract { id, patch }: UpdateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(id))
            .map_err(tracerr::wrap!())?;

        contract
            .apply(patch, self.config().recompute_end_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Update(contract))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`UpdateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Patched [`Contract`] is not valid.
    #[display("invalid `Contract`: {_0}")]
    #[from]
    Validation(contract::ValidationError),
}
