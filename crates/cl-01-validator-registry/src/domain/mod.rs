//! Registry domain: validators, their histories, and the registry state.

pub mod errors;
pub mod state;
pub mod validator;
