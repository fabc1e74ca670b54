//! Erros do núcleo.

use crate::types::DeviceId;

/// Erros do núcleo de sincronização.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Store já inicializado; os dados existentes foram preservados")]
    AlreadyInitialized,

    #[error("Referência a dispositivo inexistente: {0}")]
    InvalidRecordReference(DeviceId),

    #[error("Scheduler já foi iniciado")]
    SchedulerMisuse,

    #[error("Lista inicial inválida: {0}")]
    InvalidSeed(String),

    #[error("Erro de configuração: {0}")]
    Config(String),
}
