use lw_core::ObserverId;
use lw_output::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("output sink failed: {0}")]
    Output(#[from] OutputError),

    #[error("observer {id} failed: {message}")]
    Observer {
        id:      ObserverId,
        message: String,
    },
}

pub type NotifyResult<T> = Result<T, NotifyError>;
