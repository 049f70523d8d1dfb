use jam_bandersnatch::VrfError;
use jam_ed25519::SignatureError;
use jam_erasure::ErasureError;
use jam_primitives::{Status, ToStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("vrf: {0}")]
    Vrf(#[from] VrfError),

    #[error("ed25519: {0}")]
    Signature(#[from] SignatureError),

    #[error("erasure: {0}")]
    Erasure(#[from] ErasureError),

    #[error("config: {var}={value:?} is not valid")]
    Config { var: &'static str, value: String },
}

impl ToStatus for NativeError {
    fn status(&self) -> Status {
        match self {
            Self::Vrf(e) => e.status(),
            Self::Signature(e) => e.status(),
            Self::Erasure(e) => e.status(),
            Self::Config { .. } => Status::SetupFailed,
        }
    }
}
