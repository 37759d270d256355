//! Preconditioners for iterative solvers

mod diagonal;

pub use crate::traits::IdentityPreconditioner;
pub use diagonal::DiagonalPreconditioner;
