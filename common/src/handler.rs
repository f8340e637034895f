//! [`Handler`] abstraction.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// Generic over its arguments so that a single implementor (a service, a
/// database gateway, an open transaction) may handle many operation types,
/// each with its own result and error. Downstream crates alias this trait per
/// concern rather than defining separate ones.
pub trait Handler<Args> {
    /// Type of a successful execution result.
    type Ok;

    /// Type of an execution error.
    type Err;

    /// Executes this [`Handler`] with the provided `Args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
