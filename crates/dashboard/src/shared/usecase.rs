use clinic_queue_infra::ClinicContext;
use std::fmt::Debug;
use tracing::error;

/// A single request against the clinic's collaborators, e.g. reading the
/// appointment queue of a doctor for one poll tick
#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response: Send;
    type Errors: Send;

    async fn execute(&mut self, ctx: &ClinicContext) -> Result<Self::Response, Self::Errors>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx))]
pub async fn execute<U>(mut usecase: U, ctx: &ClinicContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
