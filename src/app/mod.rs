pub mod ports;
pub mod postback_use_case;

pub use postback_use_case::{PostbackOutcome, PostbackUseCase};
